//! Scraper configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::payment::require_http_url;

#[derive(Debug, Clone, Deserialize)]
pub struct ScraperSettings {
    /// HTML search endpoint queried with `?q=<keyword>`
    #[serde(default = "default_search_url")]
    pub search_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Upper bound on links returned by one search
    #[serde(default = "default_max_links")]
    pub max_links: usize,
}

impl ScraperSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_http_url(&self.search_url, "scraper.search_url")?;
        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            return Err(ValidationError::OutOfRange("scraper.timeout_secs"));
        }
        if self.max_links == 0 {
            return Err(ValidationError::OutOfRange("scraper.max_links"));
        }
        Ok(())
    }
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout(),
            max_links: default_max_links(),
        }
    }
}

fn default_search_url() -> String {
    crate::adapters::scraper::DEFAULT_SEARCH_URL.to_string()
}

fn default_user_agent() -> String {
    crate::adapters::scraper::DEFAULT_USER_AGENT.to_string()
}

fn default_timeout() -> u64 {
    15
}

fn default_max_links() -> usize {
    50
}
