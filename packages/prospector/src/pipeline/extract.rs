//! Two-stage field extraction for one item.
//!
//! Stage one loads the item's listing page and looks up phone, address, and
//! website. Stage two runs only when the listing produced an external
//! website; it walks that site's likely contact pages hunting an email.
//! Each stage runs inside its own scoped session.
//!
//! Nothing in here errors for missing data. A field lookup that times out,
//! finds nothing, or fails outright leaves its field empty and the pipeline
//! moves on; the only thing that cuts a stage short is not getting a
//! session at all, and even then the fields gathered so far are kept.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::session::SessionManager;
use crate::traits::extractor::{ContactField, EmailExtractor, FieldExtractor};
use crate::types::locator::DirectoryProfile;
use crate::types::record::ContactFields;

const DEFAULT_FIELD_TIMEOUT: Duration = Duration::from_secs(5);

/// Pages worth checking for a contact email, in priority order. The home
/// page goes first; most sites without a dedicated contact page put the
/// address in the footer.
const LIKELY_PATHS: [&str; 6] = [
    "",
    "/contact",
    "/contact-us",
    "/contact.html",
    "/about",
    "/about-us",
];

/// Extracts a possibly-partial field set for one locator.
pub struct ExtractionPipeline {
    sessions: SessionManager,
    fields: Arc<dyn FieldExtractor>,
    email: Arc<dyn EmailExtractor>,
    profile: DirectoryProfile,
    field_timeout: Duration,
}

impl ExtractionPipeline {
    pub fn new(
        sessions: SessionManager,
        fields: Arc<dyn FieldExtractor>,
        email: Arc<dyn EmailExtractor>,
        profile: DirectoryProfile,
    ) -> Self {
        Self {
            sessions,
            fields,
            email,
            profile,
            field_timeout: DEFAULT_FIELD_TIMEOUT,
        }
    }

    /// Per-field lookup timeout for both stages.
    pub fn with_field_timeout(mut self, timeout: Duration) -> Self {
        self.field_timeout = timeout;
        self
    }

    /// Run both stages against a listing locator.
    ///
    /// Always returns a field set; an all-empty result is a valid outcome
    /// (item unreachable, listing bare, site unresponsive).
    pub async fn extract(&self, locator: &str) -> ContactFields {
        let mut fields = self.listing_stage(locator).await;

        if let Some(website) = fields.website.clone() {
            if self.profile.is_internal(&website) {
                debug!(website = %website, "website stays inside the directory; skipping email stage");
            } else {
                fields.email = self.website_stage(&website).await;
            }
        }

        fields
    }

    /// Stage one: phone, address, website off the listing page.
    async fn listing_stage(&self, locator: &str) -> ContactFields {
        let target = locator.to_string();
        let extractor = self.fields.clone();
        let field_timeout = self.field_timeout;

        let outcome = self
            .sessions
            .with_session(move |session| {
                Box::pin(async move {
                    let mut fields = ContactFields::default();

                    if let Err(error) = session.goto(&target).await {
                        warn!(locator = %target, error = %error, "listing page failed to load");
                        return fields;
                    }

                    for field in ContactField::LISTING {
                        let lookup = extractor.lookup(session.as_session(), field);
                        match tokio::time::timeout(field_timeout, lookup).await {
                            Ok(Ok(Some(value))) => match field {
                                ContactField::Phone => fields.phone = Some(value),
                                ContactField::Address => fields.address = Some(value),
                                ContactField::Website => fields.website = Some(value),
                            },
                            Ok(Ok(None)) => {
                                debug!(field = field.as_str(), "field not on listing")
                            }
                            Ok(Err(error)) => {
                                warn!(field = field.as_str(), error = %error, "field lookup failed")
                            }
                            Err(_) => {
                                warn!(field = field.as_str(), "field lookup timed out")
                            }
                        }
                    }

                    fields
                })
            })
            .await;

        match outcome {
            Ok(fields) => fields,
            Err(error) => {
                warn!(locator = %locator, error = %error, "listing stage skipped: no session");
                ContactFields::default()
            }
        }
    }

    /// Stage two: email off the external website's likely pages.
    async fn website_stage(&self, website: &str) -> Option<String> {
        let pages = likely_pages(website);
        let extractor = self.email.clone();
        let field_timeout = self.field_timeout;

        let outcome = self
            .sessions
            .with_session(move |session| {
                Box::pin(async move {
                    for page in pages {
                        if let Err(error) = session.goto(&page).await {
                            debug!(url = %page, error = %error, "likely page failed to load");
                            continue;
                        }

                        let lookup = extractor.lookup_email(session.as_session());
                        match tokio::time::timeout(field_timeout, lookup).await {
                            Ok(Ok(Some(email))) => {
                                debug!(url = %page, "email found");
                                return Some(email);
                            }
                            Ok(Ok(None)) => {}
                            Ok(Err(error)) => {
                                warn!(url = %page, error = %error, "email lookup failed")
                            }
                            Err(_) => warn!(url = %page, "email lookup timed out"),
                        }
                    }

                    None
                })
            })
            .await;

        match outcome {
            Ok(email) => email,
            Err(error) => {
                warn!(website = %website, error = %error, "website stage skipped: no session");
                None
            }
        }
    }
}

/// Candidate pages for the email hunt, absolute, in priority order.
fn likely_pages(website: &str) -> Vec<String> {
    let mut base = website.trim_end_matches('/').to_string();
    if !base.starts_with("http") {
        base = format!("https://{base}");
    }
    LIKELY_PATHS.iter().map(|path| format!("{base}{path}")).collect()
}
