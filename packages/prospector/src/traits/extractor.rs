//! Field extraction traits: pulling one value out of a loaded page.
//!
//! Extractors never navigate; the pipeline owns the session and decides
//! which page is loaded. "Not found" is `Ok(None)`, an expected outcome;
//! `LookupError` is reserved for an extractor that could not run at all.

use async_trait::async_trait;

use crate::error::LookupResult;
use crate::traits::session::Session;

/// The listing-stage fields, looked up one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Phone,
    Address,
    Website,
}

impl ContactField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactField::Phone => "phone",
            ContactField::Address => "address",
            ContactField::Website => "website",
        }
    }

    /// The listing-stage lookup order.
    pub const LISTING: [ContactField; 3] = [
        ContactField::Phone,
        ContactField::Address,
        ContactField::Website,
    ];
}

/// Looks up listing-page fields against a session's current page.
///
/// Implementations carry the site-specific knowledge (selectors, markup
/// quirks); the pipeline carries the policy (timeouts, ordering, isolation).
#[async_trait]
pub trait FieldExtractor: Send + Sync {
    /// Look up one field. `Ok(None)` means the page does not have it.
    async fn lookup(
        &self,
        session: &dyn Session,
        field: ContactField,
    ) -> LookupResult<Option<String>>;
}

/// Looks up a contact email against a session's current page.
#[async_trait]
pub trait EmailExtractor: Send + Sync {
    /// Scan the current page for a usable contact email.
    async fn lookup_email(&self, session: &dyn Session) -> LookupResult<Option<String>>;
}
