//! Storage traits for jobs and contact records.
//!
//! The two stores have independent lifecycles on purpose: records outlive
//! their jobs, and the dedup probe consults records without going through a
//! job at all.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::types::job::Job;
use crate::types::record::{ContactRecord, IdentityKey, RecordStats};

/// Persistence for jobs. The job is mutated only by the batch processor and
/// written back whole; there is no partial-update surface.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Persist a freshly initialized job. Fails if the id already exists.
    async fn create_job(&self, job: &Job) -> Result<()>;

    /// Load a job by id. `Ok(None)` when no such job exists.
    async fn load_job(&self, id: Uuid) -> Result<Option<Job>>;

    /// Write a job back, replacing the stored copy.
    async fn save_job(&self, job: &Job) -> Result<()>;

    /// Jobs belonging to an owner, most recent first.
    async fn list_jobs_for_owner(&self, owner: &str) -> Result<Vec<Job>>;
}

/// Persistence for contact records, keyed by `(owner, name, locator)`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Whether a record already exists for the identity key.
    async fn record_exists(&self, key: &IdentityKey) -> Result<bool>;

    /// Insert a new record. Fails with `RecordExists` if the identity key
    /// is already present; creation is the dedup boundary.
    async fn create_record(&self, record: &ContactRecord) -> Result<Uuid>;

    /// An owner's records, newest first.
    async fn list_records_for_owner(
        &self,
        owner: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ContactRecord>>;

    /// Total records for an owner.
    async fn count_records_for_owner(&self, owner: &str) -> Result<usize>;

    /// Field-population stats over an owner's records.
    async fn stats_for_owner(&self, owner: &str) -> Result<RecordStats>;
}
