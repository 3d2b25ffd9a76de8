//! Top-level router assembly.

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

use super::app_state::AppState;
use super::crawl::crawl_routes;
use super::subscription::{crawl_billing_routes, subscription_routes, webhook_routes};

/// GET /health - Liveness check
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Builds the complete API router with state attached.
///
/// Middleware (tracing, CORS, timeouts) is layered on by the binary.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/subscription", subscription_routes())
        .nest("/api/crawl", crawl_routes().merge(crawl_billing_routes()))
        .merge(webhook_routes())
        .with_state(state)
}

/// Wraps the finished router so `/api/crawl/` and `/api/crawl` match the
/// same route. Must sit outside the router; route matching happens first.
pub fn trim_trailing_slash(router: Router) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router)
}
