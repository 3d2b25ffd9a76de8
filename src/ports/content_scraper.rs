//! Content scraper port.

use crate::domain::foundation::{DomainError, ErrorCode};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Text extracted from a single page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    pub page_title: Option<String>,
    pub headings: Vec<String>,
    pub paragraphs: Vec<String>,
    pub links: Vec<String>,
}

impl PageContent {
    pub fn is_empty(&self) -> bool {
        self.page_title.is_none()
            && self.headings.is_empty()
            && self.paragraphs.is_empty()
            && self.links.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Upstream returned status {0}")]
    Status(u16),
}

impl From<ScrapeError> for DomainError {
    fn from(err: ScrapeError) -> Self {
        match err {
            ScrapeError::InvalidUrl(_) => DomainError::new(ErrorCode::ValidationFailed, err.to_string())
                .with_detail("field", "url"),
            _ => DomainError::new(ErrorCode::ScraperError, err.to_string()),
        }
    }
}

#[async_trait]
pub trait ContentScraper: Send + Sync {
    /// Fetches `url` and extracts its readable content.
    async fn scrape_page(&self, url: &str) -> Result<PageContent, ScrapeError>;

    /// Runs a web search and returns result links in rank order.
    async fn search(&self, keyword: &str) -> Result<Vec<String>, ScrapeError>;
}
