//! API error type that converts application errors to HTTP responses.
//!
//! Endpoints disagree on the failure envelope their clients expect, so each
//! error carries the [`ErrorEnvelope`] of the route that produced it.
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | InvalidInput | 400 |
//! | NotFoundForUser | 404 |
//! | AccessDenied | 403 |
//! | Upstream / Infrastructure | 500 |

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::domain::subscription::{SubscriptionError, WebhookError};

/// JSON shape of an error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorEnvelope {
    /// `{"success": false, "message": ...}`
    SuccessFlag,
    /// `{"status": "error", "error": ...}` plus denial details when present.
    StatusError,
    /// `{"error": ...}`
    Plain,
}

#[derive(Debug)]
pub struct ApiError {
    error: SubscriptionError,
    envelope: ErrorEnvelope,
}

impl ApiError {
    pub fn new(error: SubscriptionError, envelope: ErrorEnvelope) -> Self {
        Self { error, envelope }
    }

    pub fn success_flag(error: SubscriptionError) -> Self {
        Self::new(error, ErrorEnvelope::SuccessFlag)
    }

    pub fn status_error(error: SubscriptionError) -> Self {
        Self::new(error, ErrorEnvelope::StatusError)
    }

    pub fn plain(error: SubscriptionError) -> Self {
        Self::new(error, ErrorEnvelope::Plain)
    }

    /// Malformed request body, reported in the route's envelope.
    pub fn from_json_rejection(rejection: JsonRejection, envelope: ErrorEnvelope) -> Self {
        tracing::debug!(error = %rejection, "rejected request body");
        Self::new(
            SubscriptionError::invalid_input("body", "Invalid JSON format"),
            envelope,
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match &self.error {
            SubscriptionError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            SubscriptionError::NotFoundForUser(_) => StatusCode::NOT_FOUND,
            SubscriptionError::AccessDenied(_) => StatusCode::FORBIDDEN,
            SubscriptionError::Upstream(_) | SubscriptionError::Infrastructure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = %self.error.code(), error = %self.error, "request failed");
        }

        let message = self.error.message();
        let body = match self.envelope {
            ErrorEnvelope::SuccessFlag => json!({ "success": false, "message": message }),
            ErrorEnvelope::Plain => json!({ "error": message }),
            ErrorEnvelope::StatusError => match &self.error {
                SubscriptionError::AccessDenied(reason) => json!({
                    "status": "error",
                    "error": message,
                    "reason": reason.code(),
                    "requires_payment": self.error.requires_payment(),
                }),
                _ => json!({ "status": "error", "error": message }),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Webhook failures, answered as `{"status": "error", "message": ...}`.
#[derive(Debug)]
pub struct WebhookApiError(pub WebhookError);

impl From<WebhookError> for WebhookApiError {
    fn from(err: WebhookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        if self.0.is_retryable() {
            tracing::error!(error = %self.0, "webhook processing failed");
        } else {
            tracing::warn!(error = %self.0, status = status.as_u16(), "webhook rejected");
        }

        let body = json!({ "status": "error", "message": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use crate::domain::subscription::AccessDeniedReason;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn denial_in_status_envelope_carries_reason() {
        let response = ApiError::status_error(SubscriptionError::access_denied(
            AccessDeniedReason::TrialExpired,
        ))
        .into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["reason"], "trial_expired");
        assert_eq!(body["requires_payment"], true);
        assert_eq!(body["error"], "Trial expired or no valid subscription.");
    }

    #[tokio::test]
    async fn not_found_in_plain_envelope() {
        let response =
            ApiError::plain(SubscriptionError::not_found_for_user(UserId::new(3))).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({ "error": "No subscription found" }));
    }

    #[tokio::test]
    async fn upstream_in_success_envelope_is_server_error() {
        let response =
            ApiError::success_flag(SubscriptionError::upstream("gateway down")).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "success": false, "message": "gateway down" })
        );
    }

    #[tokio::test]
    async fn webhook_error_uses_variant_status() {
        let response = WebhookApiError(WebhookError::InvalidSignature).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "status": "error", "message": "Invalid signature" })
        );
    }
}
