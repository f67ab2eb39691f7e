//! Integration tests for the initialize-then-step workflow.
//!
//! These tests run the full prospecting loop end to end over the in-memory
//! store and scripted mocks:
//! 1. Initialize a job from a search locator
//! 2. Step the job one item at a time
//! 3. Verify records, counters, and resumability along the way

use std::sync::Arc;

use prospector::testing::{
    MockDiscovery, MockEmailExtractor, MockFieldExtractor, MockSessionFactory,
};
use prospector::{
    BatchProcessor, ContactField, ContactFields, ContactRecord, DirectoryProfile, DiscoveredItem,
    ExtractionPipeline, IdentityKey, ItemStatus, JobInitializer, JobStore, MemoryStore,
    ProspectorError, RecordStore, SessionManager,
};

const OWNER: &str = "owner-1";
const SEARCH: &str = "https://directory.test/search?q=plumbers";
const ALPHA: &str = "https://directory.test/place/alpha";
const BETA: &str = "https://directory.test/place/beta";
const GAMMA: &str = "https://directory.test/place/gamma";

/// Discovery scripted with the standard three-item search result.
fn three_plumbers() -> MockDiscovery {
    MockDiscovery::new().with_items(
        SEARCH,
        vec![
            DiscoveredItem::new("Alpha Plumbing", ALPHA),
            DiscoveredItem::new("Beta Drains", BETA),
            DiscoveredItem::new("Gamma Pipeworks", GAMMA),
        ],
    )
}

/// Factory with every listing page scripted.
fn listing_factory() -> MockSessionFactory {
    MockSessionFactory::new()
        .with_page(ALPHA, "<html>alpha</html>")
        .with_page(BETA, "<html>beta</html>")
        .with_page(GAMMA, "<html>gamma</html>")
}

/// Wire the full stack over a shared store and session factory.
fn wire(
    discovery: MockDiscovery,
    factory: Arc<MockSessionFactory>,
    fields: MockFieldExtractor,
    email: MockEmailExtractor,
    store: Arc<MemoryStore>,
) -> (JobInitializer, BatchProcessor) {
    let profile = DirectoryProfile::new(["directory.test"]);
    let pipeline = ExtractionPipeline::new(
        SessionManager::new(factory),
        Arc::new(fields),
        Arc::new(email),
        profile.clone(),
    );
    (
        JobInitializer::new(Arc::new(discovery), store.clone(), profile),
        BatchProcessor::new(store.clone(), store, pipeline),
    )
}

#[tokio::test]
async fn test_full_run_settles_items_in_discovery_order() {
    let store = Arc::new(MemoryStore::new());
    let factory = Arc::new(listing_factory());
    let fields = MockFieldExtractor::new()
        .with_value(ALPHA, ContactField::Phone, "612-555-0101")
        .with_value(BETA, ContactField::Phone, "612-555-0102")
        .with_value(GAMMA, ContactField::Phone, "612-555-0103");
    let (initializer, processor) = wire(
        three_plumbers(),
        factory,
        fields,
        MockEmailExtractor::new(),
        store.clone(),
    );

    let job = initializer.initialize(OWNER, SEARCH).await.unwrap();
    assert_eq!(job.total_items, 3);

    let mut seen = Vec::new();
    loop {
        let step = processor.process_next(job.job_id).await.unwrap();

        // The counter invariant holds after every single call.
        let saved = store.load_job(job.job_id).await.unwrap().unwrap();
        assert_eq!(saved.processed_items, saved.terminal_count());

        if let Some(record) = step.record {
            seen.push(record.name);
        }
        if step.completed {
            break;
        }
    }

    assert_eq!(seen, ["Alpha Plumbing", "Beta Drains", "Gamma Pipeworks"]);
    assert_eq!(store.record_count(), 3);

    let stats = store.stats_for_owner(OWNER).await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.with_phone, 3);
    assert_eq!(stats.with_email, 0);
}

#[tokio::test]
async fn test_stepping_a_completed_job_changes_nothing() {
    let store = Arc::new(MemoryStore::new());
    let factory = Arc::new(listing_factory());
    let (initializer, processor) = wire(
        three_plumbers(),
        factory.clone(),
        MockFieldExtractor::new(),
        MockEmailExtractor::new(),
        store.clone(),
    );

    let job = initializer.initialize(OWNER, SEARCH).await.unwrap();
    for _ in 0..3 {
        processor.process_next(job.job_id).await.unwrap();
    }

    let sessions = factory.created_count();
    let records = store.record_count();

    for _ in 0..3 {
        let step = processor.process_next(job.job_id).await.unwrap();
        assert!(step.completed);
        assert!(step.record.is_none());
        assert_eq!(step.processed, 3);
    }

    assert_eq!(factory.created_count(), sessions);
    assert_eq!(store.record_count(), records);
}

#[tokio::test]
async fn test_empty_discovery_creates_no_job() {
    let store = Arc::new(MemoryStore::new());
    let (initializer, _processor) = wire(
        MockDiscovery::new(),
        Arc::new(MockSessionFactory::new()),
        MockFieldExtractor::new(),
        MockEmailExtractor::new(),
        store.clone(),
    );

    let result = initializer.initialize(OWNER, SEARCH).await;
    assert!(matches!(
        result,
        Err(ProspectorError::DiscoveryEmpty { ref query }) if query == SEARCH
    ));
    assert_eq!(store.job_count(), 0);
}

#[tokio::test]
async fn test_rerunning_a_search_writes_no_duplicate_records() {
    let store = Arc::new(MemoryStore::new());
    let factory = Arc::new(listing_factory());
    let (initializer, processor) = wire(
        three_plumbers(),
        factory.clone(),
        MockFieldExtractor::new(),
        MockEmailExtractor::new(),
        store.clone(),
    );

    let first = initializer.initialize(OWNER, SEARCH).await.unwrap();
    for _ in 0..3 {
        processor.process_next(first.job_id).await.unwrap();
    }
    assert_eq!(store.record_count(), 3);
    let sessions_after_first = factory.created_count();

    // Same owner, same search: every item dedups against the first run.
    let second = initializer.initialize(OWNER, SEARCH).await.unwrap();
    for _ in 0..3 {
        let step = processor.process_next(second.job_id).await.unwrap();
        assert!(step.record.is_none());
    }

    let job = store.load_job(second.job_id).await.unwrap().unwrap();
    assert!(job.is_completed());
    assert_eq!(store.record_count(), 3);
    // The probe short-circuits before any session is opened.
    assert_eq!(factory.created_count(), sessions_after_first);
}

#[tokio::test]
async fn test_partial_extraction_still_writes_a_record() {
    let store = Arc::new(MemoryStore::new());
    // Listing pages exist but no external website pages do, so the email
    // stage comes up empty while the listing fields survive.
    let factory = Arc::new(listing_factory());
    let fields = MockFieldExtractor::new()
        .with_value(ALPHA, ContactField::Phone, "612-555-0101")
        .with_value(ALPHA, ContactField::Website, "https://alphaplumbing.test");
    let (initializer, processor) = wire(
        three_plumbers(),
        factory,
        fields,
        MockEmailExtractor::new(),
        store.clone(),
    );

    let job = initializer.initialize(OWNER, SEARCH).await.unwrap();

    let first = processor.process_next(job.job_id).await.unwrap();
    let record = first.record.unwrap();
    assert_eq!(record.phone.as_deref(), Some("612-555-0101"));
    assert_eq!(record.website.as_deref(), Some("https://alphaplumbing.test"));
    assert_eq!(record.email, None);
    assert!(record.is_partial());

    // Beta has nothing scripted at all; its record is empty but still real.
    let second = processor.process_next(job.job_id).await.unwrap();
    let record = second.record.unwrap();
    assert_eq!(record.name, "Beta Drains");
    assert_eq!(record.phone, None);
    assert!(record.is_partial());
}

#[tokio::test]
async fn test_session_outage_completes_items_with_empty_records() {
    let store = Arc::new(MemoryStore::new());
    let factory = Arc::new(MockSessionFactory::new().failing());
    let (initializer, processor) = wire(
        three_plumbers(),
        factory,
        MockFieldExtractor::new(),
        MockEmailExtractor::new(),
        store.clone(),
    );

    let job = initializer.initialize(OWNER, SEARCH).await.unwrap();
    for _ in 0..3 {
        let step = processor.process_next(job.job_id).await.unwrap();
        let record = step.record.unwrap();
        assert_eq!(record.phone, None);
        assert_eq!(record.email, None);
    }

    let saved = store.load_job(job.job_id).await.unwrap().unwrap();
    assert!(saved.is_completed());
    assert!(saved.items.iter().all(|i| i.status == ItemStatus::Completed));
    assert_eq!(store.record_count(), 3);
}

#[tokio::test]
async fn test_resume_after_crash_between_record_write_and_settlement() {
    let store = Arc::new(MemoryStore::new());
    let factory = Arc::new(listing_factory());
    let (initializer, processor) = wire(
        three_plumbers(),
        factory.clone(),
        MockFieldExtractor::new(),
        MockEmailExtractor::new(),
        store.clone(),
    );

    let job = initializer.initialize(OWNER, SEARCH).await.unwrap();
    processor.process_next(job.job_id).await.unwrap();

    // Simulate a crash while processing Beta: the record write landed but
    // the process died before the item was settled.
    let orphan = ContactRecord::new(
        IdentityKey::new(OWNER, "Beta Drains", BETA),
        ContactFields::default(),
        job.job_id,
    );
    store.create_record(&orphan).await.unwrap();

    let saved = store.load_job(job.job_id).await.unwrap().unwrap();
    assert_eq!(saved.items[1].status, ItemStatus::Pending);
    let sessions_before = factory.created_count();

    // The next step finds the record, settles Beta without re-extracting,
    // and the invariant holds.
    let step = processor.process_next(job.job_id).await.unwrap();
    assert!(step.record.is_none());
    assert_eq!(step.processed, 2);
    assert_eq!(factory.created_count(), sessions_before);

    let saved = store.load_job(job.job_id).await.unwrap().unwrap();
    assert_eq!(saved.items[1].status, ItemStatus::Completed);
    assert_eq!(saved.processed_items, saved.terminal_count());

    // Gamma still processes normally afterwards.
    let step = processor.process_next(job.job_id).await.unwrap();
    assert_eq!(step.record.unwrap().name, "Gamma Pipeworks");
    assert!(step.completed);
    assert_eq!(store.record_count(), 3);
}
