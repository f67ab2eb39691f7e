//! Discovery: enumerating candidate items for a search query.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One entity found on a search-results page: a display name plus the
/// locator the listing stage will navigate to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredItem {
    pub name: String,
    pub locator: String,
}

impl DiscoveredItem {
    pub fn new(name: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locator: locator.into(),
        }
    }
}

/// Enumerates candidate items for a query.
///
/// The returned order is the processing order for the whole job, so
/// implementations must be deterministic about it (source order). An empty
/// result is valid and means "this query matches nothing"; the initializer
/// turns it into `DiscoveryEmpty`.
#[async_trait]
pub trait Discovery: Send + Sync {
    /// Enumerate items for a search locator, in source order.
    async fn discover(&self, query: &str) -> Result<Vec<DiscoveredItem>>;

    /// Name for logging.
    fn name(&self) -> &str {
        "discovery"
    }
}
