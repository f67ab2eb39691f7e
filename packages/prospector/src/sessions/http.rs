//! HTTP-backed sessions using reqwest.
//!
//! Each session carries its own client and at most one buffered page, so a
//! closed session frees everything it held. No JavaScript rendering: this
//! backend works for server-rendered directory markup only.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::error::{SessionError, SessionResult};
use crate::traits::session::{Session, SessionFactory};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const DEFAULT_PAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// A single-use HTTP session.
///
/// `goto` fetches a page and buffers its final URL and body; the buffer is
/// replaced on the next navigation and dropped on close.
pub struct HttpSession {
    client: reqwest::Client,
    current: Option<(String, String)>,
    closed: bool,
}

impl HttpSession {
    fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            current: None,
            closed: false,
        }
    }
}

#[async_trait]
impl Session for HttpSession {
    async fn goto(&mut self, url: &str) -> SessionResult<()> {
        if self.closed {
            return Err(SessionError::Closed);
        }

        // Reject before touching the network; reqwest would error anyway
        // but with a less specific kind.
        Url::parse(url).map_err(|_| SessionError::InvalidUrl {
            url: url.to_string(),
        })?;

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                SessionError::Timeout {
                    url: url.to_string(),
                }
            } else {
                SessionError::Navigation {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::Navigation {
                url: url.to_string(),
                reason: format!("HTTP {status}"),
            });
        }

        let final_url = response.url().to_string();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                SessionError::Timeout {
                    url: url.to_string(),
                }
            } else {
                SessionError::Navigation {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        debug!(url = %final_url, bytes = body.len(), "page loaded");
        self.current = Some((final_url, body));
        Ok(())
    }

    fn current_url(&self) -> Option<&str> {
        self.current.as_ref().map(|(url, _)| url.as_str())
    }

    fn page_html(&self) -> Option<&str> {
        self.current.as_ref().map(|(_, html)| html.as_str())
    }

    async fn close(&mut self) -> SessionResult<()> {
        self.closed = true;
        self.current = None;
        Ok(())
    }
}

/// Builds fresh [`HttpSession`]s with a browser-like client.
#[derive(Debug, Clone)]
pub struct HttpSessionFactory {
    page_timeout: Duration,
    user_agent: String,
}

impl Default for HttpSessionFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpSessionFactory {
    pub fn new() -> Self {
        Self {
            page_timeout: DEFAULT_PAGE_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Per-page load timeout.
    pub fn with_page_timeout(mut self, timeout: Duration) -> Self {
        self.page_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

#[async_trait]
impl SessionFactory for HttpSessionFactory {
    async fn create(&self) -> SessionResult<Box<dyn Session>> {
        // Browser-like headers to avoid trivial bot filtering.
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
                .parse()
                .unwrap(),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            "en-US,en;q=0.5".parse().unwrap(),
        );
        headers.insert(reqwest::header::CONNECTION, "keep-alive".parse().unwrap());
        headers.insert(
            reqwest::header::UPGRADE_INSECURE_REQUESTS,
            "1".parse().unwrap(),
        );

        let client = reqwest::Client::builder()
            .timeout(self.page_timeout)
            .user_agent(&self.user_agent)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| SessionError::Acquire(Box::new(e)))?;

        Ok(Box::new(HttpSession::new(client)))
    }

    fn name(&self) -> &str {
        "http"
    }
}
