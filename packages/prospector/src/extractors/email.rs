//! Email scanning for the website stage.

use async_trait::async_trait;
use regex::Regex;
use scraper::{Html, Selector};

use crate::error::{LookupError, LookupResult};
use crate::traits::extractor::EmailExtractor;
use crate::traits::session::Session;

const EMAIL_PATTERN: &str = r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b";

/// Domains (and address fragments) that are never a business contact:
/// placeholders, personal-mail providers, social platforms, and the
/// machine-generated addresses that litter page sources.
const EXCLUDED_DOMAINS: [&str; 21] = [
    "example.com",
    "test.com",
    "gmail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "facebook.com",
    "twitter.com",
    "instagram.com",
    "linkedin.com",
    "youtube.com",
    "google.com",
    "microsoft.com",
    "apple.com",
    "amazon.com",
    "noreply",
    "no-reply",
    "sentry.io",
    "wixpress.com",
    "schema.org",
    "w3.org",
];

/// Scans the current page for a usable contact email.
///
/// `mailto:` links are checked before the page source: a linked address is
/// deliberate markup, while a source match may come from scripts or
/// boilerplate. Addresses are lowercased and anything matching the excluded
/// list is skipped.
pub struct EmailScanner {
    pattern: Regex,
    excluded_domains: Vec<String>,
}

impl Default for EmailScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl EmailScanner {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(EMAIL_PATTERN).unwrap(),
            excluded_domains: EXCLUDED_DOMAINS.iter().map(|d| d.to_string()).collect(),
        }
    }

    /// Replace the excluded-domain list.
    pub fn with_excluded_domains(
        mut self,
        domains: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.excluded_domains = domains.into_iter().map(|d| d.into().to_lowercase()).collect();
        self
    }

    fn is_excluded(&self, email: &str) -> bool {
        self.excluded_domains.iter().any(|d| email.contains(d))
    }

    fn scan(&self, html: &str) -> Option<String> {
        if let Some(email) = self.scan_mailto_links(html) {
            return Some(email);
        }
        self.scan_page_source(html)
    }

    fn scan_mailto_links(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let selector = Selector::parse("a[href^='mailto:']").ok()?;

        for element in document.select(&selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Some(address) = href.strip_prefix("mailto:") else {
                continue;
            };
            // Drop ?subject=... and friends.
            let address = address.split('?').next().unwrap_or("").trim().to_lowercase();
            if self.pattern.is_match(&address) && !self.is_excluded(&address) {
                return Some(address);
            }
        }

        None
    }

    fn scan_page_source(&self, html: &str) -> Option<String> {
        self.pattern
            .find_iter(html)
            .map(|m| m.as_str().to_lowercase())
            .find(|email| !self.is_excluded(email))
    }
}

#[async_trait]
impl EmailExtractor for EmailScanner {
    async fn lookup_email(&self, session: &dyn Session) -> LookupResult<Option<String>> {
        let html = session.page_html().ok_or(LookupError::Failed {
            field: "email",
            reason: "no page loaded".to_string(),
        })?;

        Ok(self.scan(html))
    }
}
