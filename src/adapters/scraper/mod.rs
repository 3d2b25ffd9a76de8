//! Web scraping adapter.
//!
//! Fetches pages with reqwest and parses them with `scraper`. Keyword
//! searches go to an HTML search endpoint and return the outbound links.

mod html_extract;
mod http_scraper;

pub use html_extract::{extract_page, extract_search_results};
pub use http_scraper::{
    parse_http_url, HttpContentScraper, ScraperConfig, DEFAULT_SEARCH_URL, DEFAULT_USER_AGENT,
};
