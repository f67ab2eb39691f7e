use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Host markers identifying URLs that stay inside the source directory.
    pub directory_hosts: Vec<String>,
    /// Override for the search-locator markers; library defaults when unset.
    pub directory_search_markers: Option<Vec<String>>,
    pub field_timeout: Duration,
    pub page_timeout: Duration,
    pub user_agent: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            directory_hosts: csv(
                env::var("DIRECTORY_HOSTS")
                    .context("DIRECTORY_HOSTS must be set (comma-separated host markers)")?,
            ),
            directory_search_markers: env::var("DIRECTORY_SEARCH_MARKERS").ok().map(csv),
            field_timeout: duration_ms("FIELD_TIMEOUT_MS", 5_000)?,
            page_timeout: duration_ms("PAGE_TIMEOUT_MS", 10_000)?,
            user_agent: env::var("USER_AGENT").ok(),
        })
    }
}

fn csv(raw: String) -> Vec<String> {
    raw.split(',')
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

fn duration_ms(key: &str, default_ms: u64) -> Result<Duration> {
    let ms = match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{key} must be a number of milliseconds"))?,
        Err(_) => default_ms,
    };
    Ok(Duration::from_millis(ms))
}
