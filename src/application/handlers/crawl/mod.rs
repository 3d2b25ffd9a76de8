//! Crawl handlers.

mod run_crawl;

pub use run_crawl::{CrawlCommand, CrawlData, CrawlHandler, CrawlResult, CrawlTarget};
