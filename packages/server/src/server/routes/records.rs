//! Record endpoints: listing and stats, both read-only.

use axum::extract::{Extension, Query};
use axum::Json;
use prospector::{ContactRecord, RecordStats};
use serde::{Deserialize, Serialize};

use crate::server::app::AppState;
use crate::server::routes::jobs::OwnerQuery;
use crate::server::routes::respond::{error_response, ErrorResponse};

#[derive(Deserialize)]
pub struct RecordsQuery {
    pub owner: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

#[derive(Serialize)]
pub struct RecordsPage {
    pub records: Vec<ContactRecord>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

/// `GET /api/records?owner=&limit=&offset=`: an owner's records, newest
/// first, with the owner's total for pagination.
pub async fn list_records_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<RecordsQuery>,
) -> Result<Json<RecordsPage>, ErrorResponse> {
    let records = state
        .records
        .list_records_for_owner(&query.owner, query.limit, query.offset)
        .await
        .map_err(error_response)?;
    let total = state
        .records
        .count_records_for_owner(&query.owner)
        .await
        .map_err(error_response)?;

    Ok(Json(RecordsPage {
        records,
        total,
        limit: query.limit,
        offset: query.offset,
    }))
}

/// `GET /api/records/stats?owner=`: field-population counts.
pub async fn record_stats_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<RecordStats>, ErrorResponse> {
    let stats = state
        .records
        .stats_for_owner(&query.owner)
        .await
        .map_err(error_response)?;

    Ok(Json(stats))
}
