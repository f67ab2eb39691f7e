//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use prospector::{
    BatchProcessor, DirectoryProfile, EmailScanner, ExtractionPipeline, HtmlDiscovery,
    HttpSessionFactory, JobInitializer, JobStore, RecordStore, SelectorFieldExtractor,
    SessionManager,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::server::routes::{
    create_job_handler, get_job_handler, health_handler, list_jobs_handler,
    list_records_handler, record_stats_handler, step_job_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub initializer: Arc<JobInitializer>,
    pub processor: Arc<BatchProcessor>,
    pub jobs: Arc<dyn JobStore>,
    pub records: Arc<dyn RecordStore>,
}

impl AppState {
    /// Wire the full extraction stack over the given stores.
    pub fn new(config: &Config, jobs: Arc<dyn JobStore>, records: Arc<dyn RecordStore>) -> Self {
        let mut profile = DirectoryProfile::new(config.directory_hosts.clone());
        if let Some(markers) = &config.directory_search_markers {
            profile = profile.with_search_markers(markers.clone());
        }

        let mut factory = HttpSessionFactory::new().with_page_timeout(config.page_timeout);
        if let Some(user_agent) = &config.user_agent {
            factory = factory.with_user_agent(user_agent);
        }
        let sessions = SessionManager::new(Arc::new(factory));

        let pipeline = ExtractionPipeline::new(
            sessions.clone(),
            Arc::new(SelectorFieldExtractor::new()),
            Arc::new(EmailScanner::new()),
            profile.clone(),
        )
        .with_field_timeout(config.field_timeout);

        Self {
            initializer: Arc::new(JobInitializer::new(
                Arc::new(HtmlDiscovery::new(sessions)),
                jobs.clone(),
                profile,
            )),
            processor: Arc::new(BatchProcessor::new(jobs.clone(), records.clone(), pipeline)),
            jobs,
            records,
        }
    }
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/jobs", post(create_job_handler).get(list_jobs_handler))
        .route("/api/jobs/:id", get(get_job_handler))
        .route("/api/jobs/:id/step", post(step_job_handler))
        .route("/api/records", get(list_records_handler))
        .route("/api/records/stats", get(record_stats_handler))
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
