//! Axum router configuration for the crawl endpoint.

use axum::{routing::post, Router};

use crate::adapters::http::app_state::AppState;

use super::handlers::crawl;

/// Create the crawl router, mounted at `/api/crawl`.
///
/// # Routes
/// - `POST /` - Run a keyword search or page scrape (access-gated)
pub fn crawl_routes() -> Router<AppState> {
    Router::new().route("/", post(crawl))
}
