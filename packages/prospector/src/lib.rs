//! Resumable contact-record extraction for directory-style sources.
//!
//! The crate splits extraction into two explicit phases so long runs can
//! stop and resume without losing work:
//!
//! - **Initialize**: classify a locator, discover the items behind it, and
//!   freeze them into a persisted job.
//! - **Step**: settle exactly one pending item per call (dedup probe,
//!   two-stage field extraction, record write, item settlement), persisting
//!   the job before returning.
//!
//! Progress lives entirely in the stores. A process can die between any two
//! calls and the next `process_next` resumes from the first pending item;
//! records written before a crash are found again through the dedup probe
//! instead of being extracted twice.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use prospector::{
//!     BatchProcessor, DirectoryProfile, EmailScanner, ExtractionPipeline,
//!     HtmlDiscovery, HttpSessionFactory, JobInitializer, MemoryStore,
//!     SelectorFieldExtractor, SessionManager,
//! };
//!
//! let store = Arc::new(MemoryStore::new());
//! let profile = DirectoryProfile::new(["maps.example.com"]);
//! let sessions = SessionManager::new(Arc::new(HttpSessionFactory::new()));
//!
//! let initializer = JobInitializer::new(
//!     Arc::new(HtmlDiscovery::new(sessions.clone())),
//!     store.clone(),
//!     profile.clone(),
//! );
//! let processor = BatchProcessor::new(
//!     store.clone(),
//!     store.clone(),
//!     ExtractionPipeline::new(
//!         sessions,
//!         Arc::new(SelectorFieldExtractor::new()),
//!         Arc::new(EmailScanner::new()),
//!         profile,
//!     ),
//! );
//!
//! let job = initializer
//!     .initialize("owner-1", "https://maps.example.com/search?q=plumbers+minneapolis")
//!     .await?;
//! loop {
//!     let step = processor.process_next(job.job_id).await?;
//!     if step.completed {
//!         break;
//!     }
//! }
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (Discovery, Session, extractors, stores)
//! - [`types`] - Jobs, items, contact records, locator classification
//! - [`initializer`] - Locator classification and job creation
//! - [`processor`] - Single-step job advancement
//! - [`pipeline`] - Two-stage field extraction
//! - [`session`] - Scoped session acquisition
//! - [`sessions`] - Session backends (HTTP)
//! - [`discovery`] - Discovery backends (HTML search pages)
//! - [`extractors`] - Selector-driven field lookup and email scanning
//! - [`stores`] - Storage backends (memory, optional postgres)
//! - [`testing`] - Mock implementations for testing

pub mod discovery;
pub mod error;
pub mod extractors;
pub mod initializer;
pub mod pipeline;
pub mod processor;
pub mod session;
pub mod sessions;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use discovery::HtmlDiscovery;
pub use error::{LookupError, ProspectorError, SessionError};
pub use extractors::{EmailScanner, SelectorFieldExtractor};
pub use initializer::JobInitializer;
pub use pipeline::ExtractionPipeline;
pub use processor::BatchProcessor;
pub use session::{SessionHandle, SessionManager};
pub use sessions::{HttpSession, HttpSessionFactory};
pub use stores::MemoryStore;
#[cfg(feature = "postgres")]
pub use stores::PostgresStore;
pub use traits::{
    discovery::{DiscoveredItem, Discovery},
    extractor::{ContactField, EmailExtractor, FieldExtractor},
    session::{Session, SessionFactory},
    store::{JobStore, RecordStore},
};
pub use types::{
    job::{InitializedJob, Item, ItemStatus, Job, JobStatus, StepOutcome},
    locator::{DirectoryProfile, LocatorKind, DEFAULT_SEARCH_MARKERS},
    record::{ContactFields, ContactRecord, IdentityKey, RecordStats},
};
