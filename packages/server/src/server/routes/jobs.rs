//! Job endpoints: creation, stepping, inspection.

use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use prospector::{InitializedJob, Job, ProspectorError, StepOutcome};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::server::app::AppState;
use crate::server::routes::respond::{error_response, ErrorResponse};

#[derive(Deserialize)]
pub struct CreateJobRequest {
    pub owner: String,
    pub query: String,
}

#[derive(Deserialize)]
pub struct OwnerQuery {
    pub owner: String,
}

/// Job view with the item list elided; progress comes from the counters.
#[derive(Serialize)]
pub struct JobSummary {
    pub id: Uuid,
    pub owner: String,
    pub source_query: String,
    pub status: String,
    pub processed_items: usize,
    pub total_items: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Job> for JobSummary {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id,
            owner: job.owner.clone(),
            source_query: job.source_query.clone(),
            status: job.status.as_str().to_string(),
            processed_items: job.processed_items,
            total_items: job.total_items,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}

/// `POST /api/jobs`: classify the locator, discover items, persist a
/// pending job. Empty discovery is a 422 and writes nothing.
pub async fn create_job_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<InitializedJob>), ErrorResponse> {
    let initialized = state
        .initializer
        .initialize(&request.owner, &request.query)
        .await
        .map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(initialized)))
}

/// `POST /api/jobs/:id/step`: settle the next pending item.
///
/// A failed item still answers 500 with the job already advanced past it;
/// callers keep stepping until `completed`.
pub async fn step_job_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StepOutcome>, ErrorResponse> {
    let outcome = state
        .processor
        .process_next(id)
        .await
        .map_err(error_response)?;

    Ok(Json(outcome))
}

/// `GET /api/jobs/:id`: job status and counters.
pub async fn get_job_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobSummary>, ErrorResponse> {
    let job = state
        .jobs
        .load_job(id)
        .await
        .map_err(error_response)?
        .ok_or_else(|| error_response(ProspectorError::JobNotFound(id)))?;

    Ok(Json(JobSummary::from(&job)))
}

/// `GET /api/jobs?owner=`: an owner's jobs, most recent first.
pub async fn list_jobs_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Vec<JobSummary>>, ErrorResponse> {
    let jobs = state
        .jobs
        .list_jobs_for_owner(&query.owner)
        .await
        .map_err(error_response)?;

    Ok(Json(jobs.iter().map(JobSummary::from).collect()))
}
