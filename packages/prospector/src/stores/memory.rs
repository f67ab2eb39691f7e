//! In-memory storage implementation for testing and development.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{ProspectorError, Result};
use crate::traits::store::{JobStore, RecordStore};
use crate::types::job::Job;
use crate::types::record::{ContactRecord, IdentityKey, RecordStats};

/// In-memory storage for jobs and contact records.
///
/// Useful for testing and development. Not suitable for production
/// as data is lost on restart.
pub struct MemoryStore {
    jobs: RwLock<HashMap<Uuid, Job>>,
    records: RwLock<HashMap<IdentityKey, ContactRecord>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Clear all stored data.
    pub fn clear(&self) {
        self.jobs.write().unwrap().clear();
        self.records.write().unwrap().clear();
    }

    /// Get the number of stored jobs.
    pub fn job_count(&self) -> usize {
        self.jobs.read().unwrap().len()
    }

    /// Get the number of stored records.
    pub fn record_count(&self) -> usize {
        self.records.read().unwrap().len()
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn create_job(&self, job: &Job) -> Result<()> {
        let mut jobs = self.jobs.write().unwrap();
        if jobs.contains_key(&job.id) {
            return Err(ProspectorError::Storage(
                format!("job {} already exists", job.id).into(),
            ));
        }
        jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn load_job(&self, id: Uuid) -> Result<Option<Job>> {
        Ok(self.jobs.read().unwrap().get(&id).cloned())
    }

    async fn save_job(&self, job: &Job) -> Result<()> {
        self.jobs.write().unwrap().insert(job.id, job.clone());
        Ok(())
    }

    async fn list_jobs_for_owner(&self, owner: &str) -> Result<Vec<Job>> {
        let mut jobs: Vec<Job> = self
            .jobs
            .read()
            .unwrap()
            .values()
            .filter(|j| j.owner == owner)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn record_exists(&self, key: &IdentityKey) -> Result<bool> {
        Ok(self.records.read().unwrap().contains_key(key))
    }

    async fn create_record(&self, record: &ContactRecord) -> Result<Uuid> {
        let mut records = self.records.write().unwrap();
        let key = record.identity_key();
        if records.contains_key(&key) {
            return Err(ProspectorError::RecordExists {
                owner: record.owner.clone(),
                name: record.name.clone(),
            });
        }
        records.insert(key, record.clone());
        Ok(record.id)
    }

    async fn list_records_for_owner(
        &self,
        owner: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ContactRecord>> {
        let mut records: Vec<ContactRecord> = self
            .records
            .read()
            .unwrap()
            .values()
            .filter(|r| r.owner == owner)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records.into_iter().skip(offset).take(limit).collect())
    }

    async fn count_records_for_owner(&self, owner: &str) -> Result<usize> {
        Ok(self
            .records
            .read()
            .unwrap()
            .values()
            .filter(|r| r.owner == owner)
            .count())
    }

    async fn stats_for_owner(&self, owner: &str) -> Result<RecordStats> {
        let records = self.records.read().unwrap();
        Ok(RecordStats::tally(
            records.values().filter(|r| r.owner == owner),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::job::{Item, ItemStatus};
    use crate::types::record::ContactFields;
    use chrono::Duration;

    fn record(owner: &str, name: &str, fields: ContactFields) -> ContactRecord {
        ContactRecord::new(
            IdentityKey::new(owner, name, format!("https://d.test/place/{name}")),
            fields,
            Uuid::new_v4(),
        )
    }

    #[tokio::test]
    async fn job_round_trips_and_duplicate_create_fails() {
        let store = MemoryStore::new();
        let job = Job::new("owner-1", "q", vec![Item::new("Alpha", "l-a")]);

        store.create_job(&job).await.unwrap();
        let loaded = store.load_job(job.id).await.unwrap().unwrap();
        assert_eq!(loaded.owner, "owner-1");
        assert_eq!(loaded.items.len(), 1);

        assert!(store.create_job(&job).await.is_err());
        assert!(store.load_job(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_job_replaces_stored_copy() {
        let store = MemoryStore::new();
        let mut job = Job::new("owner-1", "q", vec![Item::new("Alpha", "l-a")]);
        store.create_job(&job).await.unwrap();

        job.settle_item(0, ItemStatus::Completed);
        store.save_job(&job).await.unwrap();

        let loaded = store.load_job(job.id).await.unwrap().unwrap();
        assert_eq!(loaded.processed_items, 1);
        assert!(loaded.is_completed());
    }

    #[tokio::test]
    async fn jobs_list_newest_first_per_owner() {
        let store = MemoryStore::new();
        let mut older = Job::new("owner-1", "first", vec![]);
        older.created_at = older.created_at - Duration::seconds(60);
        let newer = Job::new("owner-1", "second", vec![]);
        let other = Job::new("owner-2", "third", vec![]);

        store.create_job(&older).await.unwrap();
        store.create_job(&newer).await.unwrap();
        store.create_job(&other).await.unwrap();

        let jobs = store.list_jobs_for_owner("owner-1").await.unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].source_query, "second");
        assert_eq!(jobs[1].source_query, "first");
    }

    #[tokio::test]
    async fn record_creation_enforces_identity_key() {
        let store = MemoryStore::new();
        let a = record("owner-1", "alpha", ContactFields::default());

        assert!(!store.record_exists(&a.identity_key()).await.unwrap());
        store.create_record(&a).await.unwrap();
        assert!(store.record_exists(&a.identity_key()).await.unwrap());

        // Same identity key again, even with different fields.
        let dup = ContactRecord::new(
            a.identity_key(),
            ContactFields {
                phone: Some("612-555-0101".into()),
                ..Default::default()
            },
            Uuid::new_v4(),
        );
        let err = store.create_record(&dup).await.unwrap_err();
        assert!(matches!(err, ProspectorError::RecordExists { .. }));
        assert_eq!(store.record_count(), 1);
    }

    #[tokio::test]
    async fn records_list_newest_first_with_pagination() {
        let store = MemoryStore::new();
        for (i, name) in ["a", "b", "c"].iter().enumerate() {
            let mut r = record("owner-1", name, ContactFields::default());
            r.created_at = r.created_at - Duration::seconds(60 * (3 - i as i64));
            store.create_record(&r).await.unwrap();
        }

        let first_page = store.list_records_for_owner("owner-1", 2, 0).await.unwrap();
        assert_eq!(first_page.len(), 2);
        assert_eq!(first_page[0].name, "c");
        assert_eq!(first_page[1].name, "b");

        let second_page = store.list_records_for_owner("owner-1", 2, 2).await.unwrap();
        assert_eq!(second_page.len(), 1);
        assert_eq!(second_page[0].name, "a");

        assert_eq!(store.count_records_for_owner("owner-1").await.unwrap(), 3);
        assert_eq!(store.count_records_for_owner("owner-2").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn stats_tally_per_owner_only() {
        let store = MemoryStore::new();
        store
            .create_record(&record(
                "owner-1",
                "alpha",
                ContactFields {
                    phone: Some("612-555-0101".into()),
                    email: Some("a@alpha.test".into()),
                    ..Default::default()
                },
            ))
            .await
            .unwrap();
        store
            .create_record(&record(
                "owner-1",
                "beta",
                ContactFields {
                    phone: Some("612-555-0102".into()),
                    ..Default::default()
                },
            ))
            .await
            .unwrap();
        store
            .create_record(&record("owner-2", "gamma", ContactFields::default()))
            .await
            .unwrap();

        let stats = store.stats_for_owner("owner-1").await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.with_phone, 2);
        assert_eq!(stats.with_email, 1);
        assert_eq!(stats.with_website, 0);
    }
}
