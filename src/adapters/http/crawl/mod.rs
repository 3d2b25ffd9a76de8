//! HTTP adapter for the crawl endpoint.
//!
//! - `POST /api/crawl` - Keyword search or URL scrape, gated by subscription

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::crawl_routes;
