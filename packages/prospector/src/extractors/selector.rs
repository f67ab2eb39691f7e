//! CSS-selector field extraction for listing pages.

use async_trait::async_trait;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

use crate::error::{LookupError, LookupResult};
use crate::traits::extractor::{ContactField, FieldExtractor};
use crate::traits::session::Session;

/// Accepts phone numbers with optional country code, separators, and
/// parenthesized area codes.
const PHONE_PATTERN: &str =
    r"^\+?\d{1,4}?[-.\s]?\(?\d{1,3}?\)?[-.\s]?\d{1,4}[-.\s]?\d{1,4}[-.\s]?\d{1,9}$";

/// Looks up listing-page fields through ordered CSS selector lists.
///
/// Selectors are tried in order and the first match that survives
/// field-specific validation wins. Listing markup varies per directory, so
/// each list starts with structured attributes (`tel:` hrefs, microdata)
/// and falls back to common class names. Invalid selectors are skipped.
pub struct SelectorFieldExtractor {
    phone_selectors: Vec<String>,
    address_selectors: Vec<String>,
    website_selectors: Vec<String>,
    phone_pattern: Regex,
}

impl Default for SelectorFieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectorFieldExtractor {
    pub fn new() -> Self {
        Self {
            phone_selectors: vec![
                "a[href^='tel:']".to_string(),
                "[data-item-id^='phone']".to_string(),
                "[itemprop='telephone']".to_string(),
                ".phone".to_string(),
            ],
            address_selectors: vec![
                "address".to_string(),
                "[data-item-id='address']".to_string(),
                "[itemprop='address']".to_string(),
                ".address".to_string(),
            ],
            website_selectors: vec![
                "a[data-item-id='authority']".to_string(),
                "a[itemprop='url']".to_string(),
                "a[aria-label*='Website']".to_string(),
                ".website a[href]".to_string(),
            ],
            phone_pattern: Regex::new(PHONE_PATTERN).unwrap(),
        }
    }

    /// Replace the selector list for one field.
    pub fn with_selectors(
        mut self,
        field: ContactField,
        selectors: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let selectors = selectors.into_iter().map(|s| s.into()).collect();
        match field {
            ContactField::Phone => self.phone_selectors = selectors,
            ContactField::Address => self.address_selectors = selectors,
            ContactField::Website => self.website_selectors = selectors,
        }
        self
    }

    fn selectors_for(&self, field: ContactField) -> &[String] {
        match field {
            ContactField::Phone => &self.phone_selectors,
            ContactField::Address => &self.address_selectors,
            ContactField::Website => &self.website_selectors,
        }
    }

    fn find_field(&self, html: &str, field: ContactField) -> Option<String> {
        let document = Html::parse_document(html);

        for selector_str in self.selectors_for(field) {
            let Ok(selector) = Selector::parse(selector_str) else {
                continue;
            };
            for element in document.select(&selector) {
                let candidate = match field {
                    ContactField::Phone => {
                        // Prefer the tel: href over display text.
                        let href = element
                            .value()
                            .attr("href")
                            .and_then(|h| h.strip_prefix("tel:"))
                            .map(|h| h.to_string());
                        let text = href.unwrap_or_else(|| element_text(&element));
                        self.validate_phone(&text)
                    }
                    ContactField::Address => {
                        let text = element_text(&element);
                        // Fragments like a bare state code are not addresses.
                        (text.len() > 5).then_some(text)
                    }
                    ContactField::Website => element
                        .value()
                        .attr("href")
                        .and_then(|href| validate_url(href)),
                };

                if candidate.is_some() {
                    return candidate;
                }
            }
        }

        None
    }

    fn validate_phone(&self, raw: &str) -> Option<String> {
        let cleaned = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if cleaned.is_empty() {
            return None;
        }
        self.phone_pattern.is_match(&cleaned).then_some(cleaned)
    }
}

/// Element text with collapsed whitespace.
fn element_text(element: &scraper::ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Only absolute http(s) URLs count as a website value.
fn validate_url(href: &str) -> Option<String> {
    let url = Url::parse(href).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| href.to_string())
}

#[async_trait]
impl FieldExtractor for SelectorFieldExtractor {
    async fn lookup(
        &self,
        session: &dyn Session,
        field: ContactField,
    ) -> LookupResult<Option<String>> {
        let html = session.page_html().ok_or(LookupError::Failed {
            field: field.as_str(),
            reason: "no page loaded".to_string(),
        })?;

        Ok(self.find_field(html, field))
    }
}
