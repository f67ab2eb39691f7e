//! Job creation from a directory locator.
//!
//! Initialization is the only moment discovery runs. The item list it
//! produces is frozen into the job; every later step works off that list,
//! never off the live directory.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{ProspectorError, Result};
use crate::traits::discovery::Discovery;
use crate::traits::store::JobStore;
use crate::types::job::{InitializedJob, Item, Job};
use crate::types::locator::{DirectoryProfile, LocatorKind};

/// Turns a search or detail locator into a pending job.
pub struct JobInitializer {
    discovery: Arc<dyn Discovery>,
    jobs: Arc<dyn JobStore>,
    profile: DirectoryProfile,
}

impl JobInitializer {
    pub fn new(
        discovery: Arc<dyn Discovery>,
        jobs: Arc<dyn JobStore>,
        profile: DirectoryProfile,
    ) -> Self {
        Self {
            discovery,
            jobs,
            profile,
        }
    }

    /// Create and persist a pending job for `query`.
    ///
    /// A search locator goes through discovery, and its items enter the job
    /// in discovery order. A detail locator skips discovery and yields a
    /// single-item job. Empty discovery is an error and writes nothing, so
    /// no zero-item jobs ever reach the store.
    pub async fn initialize(&self, owner: &str, query: &str) -> Result<InitializedJob> {
        let items = match self.profile.classify(query) {
            LocatorKind::Search => {
                info!(owner, query, source = self.discovery.name(), "discovering items");
                let discovered = self.discovery.discover(query).await?;
                if discovered.is_empty() {
                    warn!(owner, query, "discovery found nothing");
                    return Err(ProspectorError::DiscoveryEmpty {
                        query: query.to_string(),
                    });
                }
                discovered
                    .into_iter()
                    .map(|d| Item::new(d.name, d.locator))
                    .collect()
            }
            LocatorKind::Detail => vec![Item::new(self.profile.display_name(query), query)],
        };

        let job = Job::new(owner, query, items);
        self.jobs.create_job(&job).await?;
        info!(
            job_id = %job.id,
            owner,
            total_items = job.total_items,
            "job created"
        );

        Ok(InitializedJob {
            job_id: job.id,
            total_items: job.total_items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::memory::MemoryStore;
    use crate::testing::MockDiscovery;
    use crate::traits::discovery::DiscoveredItem;
    use crate::types::job::{ItemStatus, JobStatus};

    const SEARCH: &str = "https://directory.test/search?q=plumbers";

    fn profile() -> DirectoryProfile {
        DirectoryProfile::new(["directory.test"])
    }

    fn initializer(
        discovery: Arc<MockDiscovery>,
        store: Arc<MemoryStore>,
    ) -> JobInitializer {
        JobInitializer::new(discovery, store, profile())
    }

    #[tokio::test]
    async fn search_locator_creates_job_in_discovery_order() {
        let discovery = Arc::new(MockDiscovery::new().with_items(
            SEARCH,
            vec![
                DiscoveredItem::new("Alpha", "https://directory.test/place/alpha"),
                DiscoveredItem::new("Beta", "https://directory.test/place/beta"),
                DiscoveredItem::new("Gamma", "https://directory.test/place/gamma"),
            ],
        ));
        let store = Arc::new(MemoryStore::new());

        let initialized = initializer(discovery, store.clone())
            .initialize("owner-1", SEARCH)
            .await
            .unwrap();

        assert_eq!(initialized.total_items, 3);
        let job = store.load_job(initialized.job_id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.owner, "owner-1");
        assert_eq!(job.source_query, SEARCH);
        let names: Vec<&str> = job.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Alpha", "Beta", "Gamma"]);
        assert!(job.items.iter().all(|i| i.status == ItemStatus::Pending));
    }

    #[tokio::test]
    async fn empty_discovery_is_an_error_and_writes_no_job() {
        let discovery = Arc::new(MockDiscovery::new());
        let store = Arc::new(MemoryStore::new());

        let result = initializer(discovery, store.clone())
            .initialize("owner-1", SEARCH)
            .await;

        assert!(matches!(
            result,
            Err(ProspectorError::DiscoveryEmpty { ref query }) if query == SEARCH
        ));
        assert_eq!(store.job_count(), 0);
    }

    #[tokio::test]
    async fn detail_locator_skips_discovery() {
        let discovery = Arc::new(MockDiscovery::new());
        let store = Arc::new(MemoryStore::new());

        let initialized = initializer(discovery.clone(), store.clone())
            .initialize("owner-1", "https://directory.test/place/alpha-plumbing")
            .await
            .unwrap();

        assert_eq!(initialized.total_items, 1);
        assert!(discovery.calls().is_empty());

        let job = store.load_job(initialized.job_id).await.unwrap().unwrap();
        assert_eq!(job.items[0].name, "alpha plumbing");
        assert_eq!(
            job.items[0].locator,
            "https://directory.test/place/alpha-plumbing"
        );
    }

    #[tokio::test]
    async fn discovery_failure_propagates_and_writes_no_job() {
        let discovery = Arc::new(MockDiscovery::new().fail_query(SEARCH));
        let store = Arc::new(MemoryStore::new());

        let result = initializer(discovery, store.clone())
            .initialize("owner-1", SEARCH)
            .await;

        assert!(matches!(result, Err(ProspectorError::Discovery(_))));
        assert_eq!(store.job_count(), 0);
    }
}
