//! Scoped session acquisition.
//!
//! Every pipeline stage runs inside [`SessionManager::with_session`]: the
//! manager creates a fresh session, hands the stage a [`SessionHandle`], and
//! closes the session after the stage returns, whether the stage succeeded,
//! found nothing, timed out, or crashed. Sessions are never stored anywhere
//! ambient and never reused across stages or items, so peak memory is one
//! session's footprint.
//!
//! Usage mirrors a scoped transaction:
//!
//! ```rust,ignore
//! let fields = manager
//!     .with_session(move |session: &mut SessionHandle| {
//!         Box::pin(async move {
//!             session.goto(&locator).await.ok();
//!             extractor.lookup(session.as_session(), ContactField::Phone).await
//!         })
//!     })
//!     .await?;
//! ```

use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::{debug, warn};

use crate::error::{SessionError, SessionResult};
use crate::traits::session::{Session, SessionFactory};

/// A live session scoped to one `with_session` call.
///
/// Stages receive `&mut SessionHandle` and can navigate and read pages, but
/// cannot close or leak the underlying session; the manager owns teardown.
pub struct SessionHandle {
    inner: Box<dyn Session>,
}

impl SessionHandle {
    fn new(inner: Box<dyn Session>) -> Self {
        Self { inner }
    }

    /// Navigate to a URL and load its content.
    pub async fn goto(&mut self, url: &str) -> SessionResult<()> {
        self.inner.goto(url).await
    }

    /// Final URL of the currently loaded page, if any.
    pub fn current_url(&self) -> Option<&str> {
        self.inner.current_url()
    }

    /// Markup of the currently loaded page, if any.
    pub fn page_html(&self) -> Option<&str> {
        self.inner.page_html()
    }

    /// Borrow the session for extractors.
    pub fn as_session(&self) -> &dyn Session {
        self.inner.as_ref()
    }

    async fn close(&mut self) -> SessionResult<()> {
        self.inner.close().await
    }
}

/// Creates and tears down one session per stage.
#[derive(Clone)]
pub struct SessionManager {
    factory: Arc<dyn SessionFactory>,
}

impl SessionManager {
    pub fn new(factory: Arc<dyn SessionFactory>) -> Self {
        Self { factory }
    }

    /// Run `f` with a freshly created session, closing it on every exit path.
    ///
    /// Returns `Err` only when the session could not be *acquired*; whatever
    /// `f` produces (including its own error type) passes through as the
    /// `Ok` value. A close failure is logged and swallowed; by then the
    /// stage's result already exists and the session is abandoned either way.
    pub async fn with_session<T, F>(&self, f: F) -> SessionResult<T>
    where
        F: for<'a> FnOnce(&'a mut SessionHandle) -> BoxFuture<'a, T>,
    {
        let session = self.factory.create().await.map_err(|error| {
            warn!(factory = self.factory.name(), error = %error, "session acquire failed");
            error
        })?;
        debug!(factory = self.factory.name(), "session acquired");

        let mut handle = SessionHandle::new(session);
        let value = f(&mut handle).await;

        if let Err(error) = handle.close().await {
            warn!(factory = self.factory.name(), error = %error, "session close failed");
        } else {
            debug!(factory = self.factory.name(), "session closed");
        }

        Ok(value)
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("factory", &self.factory.name())
            .finish()
    }
}
