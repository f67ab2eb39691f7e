//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that orchestrate extraction
//! without real network traffic or a real automation backend. Every mock is
//! deterministic, scripted through `with_*` builders, and records the calls
//! made against it for assertions.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{LookupError, LookupResult, ProspectorError, Result, SessionError, SessionResult};
use crate::traits::discovery::{DiscoveredItem, Discovery};
use crate::traits::extractor::{ContactField, EmailExtractor, FieldExtractor};
use crate::traits::session::{Session, SessionFactory};

// ============================================================================
// Discovery
// ============================================================================

/// A mock discovery source with scripted results per query.
#[derive(Default)]
pub struct MockDiscovery {
    /// Predefined item lists by query
    items: Arc<RwLock<HashMap<String, Vec<DiscoveredItem>>>>,

    /// Queries that should fail
    fail_queries: Arc<RwLock<Vec<String>>>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the items returned for a query.
    pub fn with_items(self, query: impl Into<String>, items: Vec<DiscoveredItem>) -> Self {
        self.items.write().unwrap().insert(query.into(), items);
        self
    }

    /// Mark a query as failing.
    pub fn fail_query(self, query: impl Into<String>) -> Self {
        self.fail_queries.write().unwrap().push(query.into());
        self
    }

    /// Queries this mock has been asked to discover, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl Discovery for MockDiscovery {
    async fn discover(&self, query: &str) -> Result<Vec<DiscoveredItem>> {
        self.calls.write().unwrap().push(query.to_string());

        if self.fail_queries.read().unwrap().contains(&query.to_string()) {
            return Err(ProspectorError::Discovery(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "mock discovery refused",
            ))));
        }

        Ok(self
            .items
            .read()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default())
    }

    fn name(&self) -> &str {
        "mock-discovery"
    }
}

// ============================================================================
// Sessions
// ============================================================================

/// Lifecycle event recorded by [`MockSessionFactory`] and its sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Created,
    Navigated(String),
    Closed,
}

/// A scripted session backed by a shared page map.
///
/// `goto` succeeds only for scripted URLs; everything fails with
/// `SessionError::Closed` once the session has been closed.
pub struct MockSession {
    pages: Arc<RwLock<HashMap<String, String>>>,
    events: Arc<RwLock<Vec<SessionEvent>>>,
    current: Option<(String, String)>,
    closed: bool,
}

#[async_trait]
impl Session for MockSession {
    async fn goto(&mut self, url: &str) -> SessionResult<()> {
        if self.closed {
            return Err(SessionError::Closed);
        }
        self.events
            .write()
            .unwrap()
            .push(SessionEvent::Navigated(url.to_string()));

        match self.pages.read().unwrap().get(url) {
            Some(html) => {
                self.current = Some((url.to_string(), html.clone()));
                Ok(())
            }
            None => Err(SessionError::Navigation {
                url: url.to_string(),
                reason: "no scripted page".to_string(),
            }),
        }
    }

    fn current_url(&self) -> Option<&str> {
        self.current.as_ref().map(|(url, _)| url.as_str())
    }

    fn page_html(&self) -> Option<&str> {
        self.current.as_ref().map(|(_, html)| html.as_str())
    }

    async fn close(&mut self) -> SessionResult<()> {
        if !self.closed {
            self.closed = true;
            self.current = None;
            self.events.write().unwrap().push(SessionEvent::Closed);
        }
        Ok(())
    }
}

/// A mock session factory with scripted pages and failure injection.
#[derive(Default)]
pub struct MockSessionFactory {
    /// Predefined page markup by URL
    pages: Arc<RwLock<HashMap<String, String>>>,

    /// Lifecycle events across all sessions from this factory
    events: Arc<RwLock<Vec<SessionEvent>>>,

    /// When set, `create` fails once this many sessions have been handed out
    fail_after: Option<usize>,
}

impl MockSessionFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a page every session from this factory can navigate to.
    pub fn with_page(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.write().unwrap().insert(url.into(), html.into());
        self
    }

    /// Make every `create` fail with `SessionError::Acquire`.
    pub fn failing(self) -> Self {
        self.failing_after(0)
    }

    /// Let the first `n` sessions succeed, then fail acquisition.
    pub fn failing_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    /// All lifecycle events so far, in order.
    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.read().unwrap().clone()
    }

    /// Number of sessions created so far.
    pub fn created_count(&self) -> usize {
        self.events
            .read()
            .unwrap()
            .iter()
            .filter(|e| **e == SessionEvent::Created)
            .count()
    }
}

#[async_trait]
impl SessionFactory for MockSessionFactory {
    async fn create(&self) -> SessionResult<Box<dyn Session>> {
        if matches!(self.fail_after, Some(limit) if self.created_count() >= limit) {
            return Err(SessionError::Acquire(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "mock acquire refused",
            ))));
        }

        self.events.write().unwrap().push(SessionEvent::Created);
        Ok(Box::new(MockSession {
            pages: self.pages.clone(),
            events: self.events.clone(),
            current: None,
            closed: false,
        }))
    }

    fn name(&self) -> &str {
        "mock-session-factory"
    }
}

// ============================================================================
// Extractors
// ============================================================================

/// Record of one lookup made against [`MockFieldExtractor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedLookup {
    /// The session's current URL at lookup time (empty when no page loaded)
    pub url: String,
    pub field: &'static str,
}

/// A mock field extractor keyed by the session's current page.
///
/// Values are scripted per `(url, field)`, so a lookup only finds something
/// when the caller actually navigated first.
#[derive(Default)]
pub struct MockFieldExtractor {
    values: Arc<RwLock<HashMap<(String, &'static str), String>>>,
    fail_fields: Arc<RwLock<Vec<&'static str>>>,
    delays: Arc<RwLock<HashMap<&'static str, Duration>>>,
    calls: Arc<RwLock<Vec<RecordedLookup>>>,
}

impl MockFieldExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a field value for a page.
    pub fn with_value(
        self,
        url: impl Into<String>,
        field: ContactField,
        value: impl Into<String>,
    ) -> Self {
        self.values
            .write()
            .unwrap()
            .insert((url.into(), field.as_str()), value.into());
        self
    }

    /// Make lookups for a field fail.
    pub fn failing_field(self, field: ContactField) -> Self {
        self.fail_fields.write().unwrap().push(field.as_str());
        self
    }

    /// Make lookups for a field sleep before answering, to trip timeouts.
    pub fn slow_field(self, field: ContactField, delay: Duration) -> Self {
        self.delays.write().unwrap().insert(field.as_str(), delay);
        self
    }

    /// All lookups made against this mock, in order.
    pub fn calls(&self) -> Vec<RecordedLookup> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl FieldExtractor for MockFieldExtractor {
    async fn lookup(
        &self,
        session: &dyn Session,
        field: ContactField,
    ) -> LookupResult<Option<String>> {
        let url = session.current_url().unwrap_or("").to_string();
        self.calls.write().unwrap().push(RecordedLookup {
            url: url.clone(),
            field: field.as_str(),
        });

        let delay = self.delays.read().unwrap().get(field.as_str()).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_fields.read().unwrap().contains(&field.as_str()) {
            return Err(LookupError::Failed {
                field: field.as_str(),
                reason: "scripted failure".to_string(),
            });
        }

        Ok(self
            .values
            .read()
            .unwrap()
            .get(&(url, field.as_str()))
            .cloned())
    }
}

/// A mock email extractor keyed by the session's current page.
#[derive(Default)]
pub struct MockEmailExtractor {
    emails: Arc<RwLock<HashMap<String, String>>>,
    delay: Arc<RwLock<Option<Duration>>>,
    fail_all: bool,

    /// URLs scanned, in order
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockEmailExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the email found on a page.
    pub fn with_email(self, url: impl Into<String>, email: impl Into<String>) -> Self {
        self.emails.write().unwrap().insert(url.into(), email.into());
        self
    }

    /// Make every scan sleep before answering.
    pub fn slow(self, delay: Duration) -> Self {
        *self.delay.write().unwrap() = Some(delay);
        self
    }

    /// Make every scan fail.
    pub fn failing(mut self) -> Self {
        self.fail_all = true;
        self
    }

    /// URLs this mock has scanned, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl EmailExtractor for MockEmailExtractor {
    async fn lookup_email(&self, session: &dyn Session) -> LookupResult<Option<String>> {
        let url = session.current_url().unwrap_or("").to_string();
        self.calls.write().unwrap().push(url.clone());

        let delay = *self.delay.read().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_all {
            return Err(LookupError::Failed {
                field: "email",
                reason: "scripted failure".to_string(),
            });
        }

        Ok(self.emails.read().unwrap().get(&url).cloned())
    }
}
