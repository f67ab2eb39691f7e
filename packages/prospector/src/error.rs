//! Typed errors for the prospector library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. Field-level absence is
//! never an error here: a lookup that finds nothing returns `Ok(None)`,
//! and only structural failures surface through these types.

use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by the orchestration layer (`initialize` / `process_next`).
#[derive(Debug, Error)]
pub enum ProspectorError {
    /// Discovery returned zero items for the query; no job was created
    #[error("discovery returned no items for query: {query}")]
    DiscoveryEmpty { query: String },

    /// Discovery itself failed (network, markup)
    #[error("discovery failed: {0}")]
    Discovery(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// No job exists for the given id
    #[error("job not found: {0}")]
    JobNotFound(Uuid),

    /// An item failed outside the field-lookup boundary; the item is
    /// marked failed and the job's counters have already advanced
    #[error("item '{item}' failed: {source}")]
    ItemProcessing {
        item: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Storage operation failed
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A record already exists for an identity key being inserted
    #[error("record already exists for {owner}/{name}")]
    RecordExists { owner: String, name: String },
}

impl ProspectorError {
    /// True when the error means the caller should stop polling this job.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::JobNotFound(_) | Self::DiscoveryEmpty { .. })
    }
}

/// Errors from acquiring, driving, or releasing an automation session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Session could not be created at all
    #[error("failed to acquire session: {0}")]
    Acquire(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Navigation to a URL failed
    #[error("navigation failed for {url}: {reason}")]
    Navigation { url: String, reason: String },

    /// Navigation exceeded the session's operation timeout
    #[error("timeout loading: {url}")]
    Timeout { url: String },

    /// Invalid URL handed to the session
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Operation attempted on a session that was already closed
    #[error("session already closed")]
    Closed,
}

/// Errors from a single field lookup. Not-found is `Ok(None)`, not an error.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Lookup did not finish within its per-field timeout
    #[error("lookup timed out for field: {field}")]
    Timeout { field: &'static str },

    /// Extractor failed against the current page (bad markup, no page loaded)
    #[error("lookup failed for field {field}: {reason}")]
    Failed { field: &'static str, reason: String },
}

/// Result type alias for orchestration operations.
pub type Result<T> = std::result::Result<T, ProspectorError>;

/// Result type alias for session operations.
pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// Result type alias for field lookups.
pub type LookupResult<T> = std::result::Result<T, LookupError>;
