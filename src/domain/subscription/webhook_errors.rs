//! Error types for payment-provider webhook handling.
//!
//! Each variant maps to the HTTP status returned to the provider. Providers
//! redeliver on 5xx, so only transient infrastructure faults map there.

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WebhookError {
    /// Signature header absent from the request.
    #[error("Missing signature")]
    MissingSignature,

    /// HMAC did not match the body.
    #[error("Invalid signature")]
    InvalidSignature,

    /// The remote verification API refused the event.
    #[error("Webhook verification failed: {0}")]
    VerificationFailed(String),

    /// Could not obtain a token for the remote verification API.
    #[error("Failed to get access token: {0}")]
    TokenUnavailable(String),

    /// Failed to parse the webhook payload.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The event carries no key to correlate it with a record.
    #[error("No subscription ID")]
    MissingSubscriptionId,

    /// The event referenced a subscription we have no record of.
    #[error("Subscription not found")]
    SubscriptionNotFound,

    /// Transport failure talking to the provider.
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl WebhookError {
    /// True for transient faults the provider should redeliver.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WebhookError::Database(_)
                | WebhookError::Upstream(_)
                | WebhookError::TokenUnavailable(_)
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MissingSignature
            | WebhookError::InvalidSignature
            | WebhookError::VerificationFailed(_)
            | WebhookError::ParseError(_)
            | WebhookError::MissingSubscriptionId => StatusCode::BAD_REQUEST,

            WebhookError::SubscriptionNotFound => StatusCode::NOT_FOUND,

            WebhookError::TokenUnavailable(_)
            | WebhookError::Upstream(_)
            | WebhookError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
