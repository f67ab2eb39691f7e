//! Session traits: the ephemeral automation context behind each stage.
//!
//! A session is single-use: one stage acquires it, navigates, reads pages,
//! and the session manager closes it before the next stage starts. Nothing
//! about a session is ever persisted.

use async_trait::async_trait;

use crate::error::SessionResult;

/// An isolated, browser-like execution context.
///
/// `goto` loads a page; the accessors expose whatever is currently loaded.
/// After `close`, every operation fails with `SessionError::Closed`.
#[async_trait]
pub trait Session: Send + Sync {
    /// Navigate to a URL and load its content into the session.
    async fn goto(&mut self, url: &str) -> SessionResult<()>;

    /// Final URL of the currently loaded page (after redirects), if any.
    fn current_url(&self) -> Option<&str>;

    /// Markup of the currently loaded page, if any.
    fn page_html(&self) -> Option<&str>;

    /// Release the session's resources. Idempotent.
    async fn close(&mut self) -> SessionResult<()>;
}

/// Creates one fresh session per stage.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn create(&self) -> SessionResult<Box<dyn Session>>;

    /// Name for logging.
    fn name(&self) -> &str {
        "session-factory"
    }
}
