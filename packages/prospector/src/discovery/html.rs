//! HTML discovery: enumerating items from a search-results page.

use std::collections::HashSet;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};
use url::Url;

use crate::error::{ProspectorError, Result, SessionError};
use crate::session::SessionManager;
use crate::traits::discovery::{DiscoveredItem, Discovery};

/// Items whose listing card carries no readable name still get extracted;
/// the locator keeps them distinguishable.
const FALLBACK_NAME: &str = "Unknown Business";

const DEFAULT_MAX_ITEMS: usize = 20;

/// Finds `(name, locator)` pairs on a search-results page.
///
/// Link selectors are tried in order and the first one that yields anything
/// wins; within it, items keep source order, duplicates (same locator with
/// the query string stripped) are dropped, and the list is capped. Names are
/// read from a headline inside the link, then the link text, then its
/// `aria-label`.
pub struct HtmlDiscovery {
    sessions: SessionManager,
    link_selectors: Vec<String>,
    name_selectors: Vec<String>,
    max_items: usize,
}

impl HtmlDiscovery {
    pub fn new(sessions: SessionManager) -> Self {
        Self {
            sessions,
            link_selectors: vec![
                "a[href*='/place/']".to_string(),
                "div[role='feed'] a[href]".to_string(),
                ".results a[href]".to_string(),
                ".result a[href]".to_string(),
            ],
            name_selectors: vec![
                "h3".to_string(),
                "h2".to_string(),
                ".fontHeadlineSmall".to_string(),
                ".name".to_string(),
            ],
            max_items: DEFAULT_MAX_ITEMS,
        }
    }

    /// Replace the link selector list.
    pub fn with_link_selectors(
        mut self,
        selectors: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.link_selectors = selectors.into_iter().map(|s| s.into()).collect();
        self
    }

    /// Cap on items per search page.
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    fn parse_items(&self, base_url: &str, html: &str) -> Vec<DiscoveredItem> {
        let document = Html::parse_document(html);
        let base = Url::parse(base_url).ok();

        for selector_str in &self.link_selectors {
            let Ok(selector) = Selector::parse(selector_str) else {
                continue;
            };

            let mut items = Vec::new();
            let mut seen = HashSet::new();
            for element in document.select(&selector) {
                let Some(href) = element.value().attr("href") else {
                    continue;
                };
                let Some(locator) = resolve_href(base.as_ref(), href) else {
                    continue;
                };

                // The same entity often appears once per card widget with
                // varying query strings.
                let dedup_key = locator.split('?').next().unwrap_or(&locator).to_string();
                if !seen.insert(dedup_key) {
                    continue;
                }

                items.push(DiscoveredItem::new(self.item_name(&element), locator));
                if items.len() >= self.max_items {
                    break;
                }
            }

            debug!(selector = %selector_str, count = items.len(), "link selector tried");
            if !items.is_empty() {
                return items;
            }
        }

        Vec::new()
    }

    fn item_name(&self, link: &ElementRef<'_>) -> String {
        for selector_str in &self.name_selectors {
            let Ok(selector) = Selector::parse(selector_str) else {
                continue;
            };
            if let Some(name) = link.select(&selector).next() {
                let text = collapse_text(&name.text().collect::<String>());
                if !text.is_empty() {
                    return text;
                }
            }
        }

        let text = collapse_text(&link.text().collect::<String>());
        if !text.is_empty() {
            return text;
        }

        match link.value().attr("aria-label") {
            Some(label) if !label.trim().is_empty() => label.trim().to_string(),
            _ => FALLBACK_NAME.to_string(),
        }
    }
}

fn collapse_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Absolute http(s) locator for a link href, resolving relative paths
/// against the loaded page.
fn resolve_href(base: Option<&Url>, href: &str) -> Option<String> {
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    if let Ok(url) = Url::parse(href) {
        return matches!(url.scheme(), "http" | "https").then(|| url.to_string());
    }
    let joined = base?.join(href).ok()?;
    matches!(joined.scheme(), "http" | "https").then(|| joined.to_string())
}

#[async_trait]
impl Discovery for HtmlDiscovery {
    async fn discover(&self, query: &str) -> Result<Vec<DiscoveredItem>> {
        let target = query.to_string();
        let loaded = self
            .sessions
            .with_session(move |session| {
                Box::pin(async move {
                    session.goto(&target).await?;
                    let url = session
                        .current_url()
                        .map(|u| u.to_string())
                        .unwrap_or_else(|| target.clone());
                    let html = session.page_html().unwrap_or_default().to_string();
                    Ok::<_, SessionError>((url, html))
                })
            })
            .await
            .map_err(|e| ProspectorError::Discovery(Box::new(e)))?
            .map_err(|e| ProspectorError::Discovery(Box::new(e)))?;

        let (final_url, html) = loaded;
        let items = self.parse_items(&final_url, &html);
        info!(query = %query, count = items.len(), "discovery finished");
        Ok(items)
    }

    fn name(&self) -> &str {
        "html"
    }
}
