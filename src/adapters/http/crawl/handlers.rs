//! HTTP handler for the protected crawl action.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::adapters::http::app_state::AppState;
use crate::adapters::http::error::{ApiError, ErrorEnvelope};
use crate::application::handlers::crawl::{CrawlCommand, CrawlTarget};
use crate::domain::subscription::SubscriptionError;

use super::dto::{CrawlRequest, CrawlResponse};

/// POST /api/crawl - Search by keyword or scrape a URL
pub async fn crawl(
    State(state): State<AppState>,
    payload: Result<Json<CrawlRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) =
        payload.map_err(|e| ApiError::from_json_rejection(e, ErrorEnvelope::StatusError))?;

    let user_id = request.user_id.ok_or_else(|| {
        ApiError::status_error(SubscriptionError::invalid_input("user_id", "Missing user_id"))
    })?;

    let target = CrawlTarget::from_inputs(request.keyword.as_deref(), request.url.as_deref())
        .ok_or_else(|| {
            ApiError::status_error(SubscriptionError::invalid_input(
                "keyword",
                "Please provide a keyword or URL.",
            ))
        })?;

    let result = state
        .crawl_handler()
        .handle(CrawlCommand { user_id, target })
        .await
        .map_err(ApiError::status_error)?;

    Ok(Json(CrawlResponse::from(result)))
}
