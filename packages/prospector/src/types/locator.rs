//! Locator classification and the directory profile.
//!
//! The profile is the one place that knows what the source directory looks
//! like: which hosts count as "inside" the directory and which URL fragments
//! mark a search-results page. Everything downstream consumes the tagged
//! classification instead of re-deriving string matches.

use serde::{Deserialize, Serialize};
use url::Url;

/// What kind of page a locator points at within the source directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocatorKind {
    /// A search-results page enumerating many entities.
    Search,
    /// A single entity's detail page.
    Detail,
}

/// Fragments that mark a directory URL as a search-results page.
pub const DEFAULT_SEARCH_MARKERS: [&str; 5] = ["query=", "q=", "data=", "search/", "/search"];

/// Shape of the directory-style source: internal hosts and search markers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryProfile {
    /// Substrings identifying URLs that stay inside the directory
    /// (hosts, shortener domains). Matched case-insensitively.
    internal_hosts: Vec<String>,
    /// Substrings identifying a search-results locator.
    search_markers: Vec<String>,
}

impl DirectoryProfile {
    /// Profile for a directory reachable through the given host markers,
    /// with the default search markers.
    pub fn new(internal_hosts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            internal_hosts: internal_hosts
                .into_iter()
                .map(|h| h.into().to_lowercase())
                .collect(),
            search_markers: DEFAULT_SEARCH_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }

    /// Replace the search markers.
    pub fn with_search_markers(
        mut self,
        markers: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.search_markers = markers.into_iter().map(|m| m.into().to_lowercase()).collect();
        self
    }

    /// Classify a locator as a search-results page or an entity detail page.
    pub fn classify(&self, locator: &str) -> LocatorKind {
        let lower = locator.to_lowercase();
        if self.search_markers.iter().any(|m| lower.contains(m)) {
            LocatorKind::Search
        } else {
            LocatorKind::Detail
        }
    }

    /// Whether a URL points back into the source directory.
    ///
    /// Gates the website stage: an "external website" field value that is
    /// really a directory link must not be crawled for email.
    pub fn is_internal(&self, url: &str) -> bool {
        if url.is_empty() {
            return false;
        }
        let lower = url.to_lowercase();
        self.internal_hosts.iter().any(|h| lower.contains(h))
    }

    /// A human-readable name derived from a detail locator, used when a
    /// single-item job is created directly from a detail page.
    pub fn display_name(&self, locator: &str) -> String {
        if let Ok(url) = Url::parse(locator) {
            if let Some(segment) = url
                .path_segments()
                .and_then(|mut s| s.rfind(|seg| !seg.is_empty()))
            {
                return segment.replace(['-', '_', '+'], " ");
            }
            if let Some(host) = url.host_str() {
                return host.to_string();
            }
        }
        locator.to_string()
    }
}
