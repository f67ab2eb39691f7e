//! Error-to-response mapping shared by all handlers.

use axum::http::StatusCode;
use axum::Json;
use prospector::ProspectorError;
use serde::Serialize;

/// JSON body carried by every non-2xx response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub type ErrorResponse = (StatusCode, Json<ErrorBody>);

/// Map a library error onto the HTTP surface.
///
/// Unknown jobs and empty discovery are client-visible conditions; anything
/// else (storage, an item that failed mid-step) is a 500. An item-processing
/// 500 does not mean the job is stuck: the failed item was settled and the
/// next step call moves on.
pub fn error_response(error: ProspectorError) -> ErrorResponse {
    let status = match &error {
        ProspectorError::JobNotFound(_) => StatusCode::NOT_FOUND,
        ProspectorError::DiscoveryEmpty { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorBody { error: error.to_string() }))
}
