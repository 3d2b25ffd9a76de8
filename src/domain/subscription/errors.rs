//! Subscription-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | InvalidInput | 400 |
//! | NotFoundForUser | 404 |
//! | AccessDenied | 403 |
//! | Upstream | 500 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, UserId, ValidationError};

use super::AccessDeniedReason;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// Request was missing a field or carried a malformed one.
    InvalidInput { field: String, message: String },

    /// No subscription record exists for this user.
    NotFoundForUser(UserId),

    /// The user may not perform the protected action.
    AccessDenied(AccessDeniedReason),

    /// A payment provider or scraper call failed.
    Upstream(String),

    Infrastructure(String),
}

impl SubscriptionError {
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        SubscriptionError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found_for_user(user_id: UserId) -> Self {
        SubscriptionError::NotFoundForUser(user_id)
    }

    pub fn access_denied(reason: AccessDeniedReason) -> Self {
        SubscriptionError::AccessDenied(reason)
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        SubscriptionError::Upstream(message.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        SubscriptionError::Infrastructure(message.into())
    }

    /// Denials can only be lifted by paying.
    pub fn requires_payment(&self) -> bool {
        matches!(self, SubscriptionError::AccessDenied(_))
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SubscriptionError::InvalidInput { .. } => ErrorCode::ValidationFailed,
            SubscriptionError::NotFoundForUser(_) => ErrorCode::SubscriptionNotFound,
            SubscriptionError::AccessDenied(_) => ErrorCode::AccessDenied,
            SubscriptionError::Upstream(_) => ErrorCode::PaymentProviderError,
            SubscriptionError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// User-facing message.
    pub fn message(&self) -> String {
        match self {
            SubscriptionError::InvalidInput { message, .. } => message.clone(),
            SubscriptionError::NotFoundForUser(_) => "No subscription found".to_string(),
            SubscriptionError::AccessDenied(_) => {
                "Trial expired or no valid subscription.".to_string()
            }
            SubscriptionError::Upstream(msg) => msg.clone(),
            SubscriptionError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for SubscriptionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for SubscriptionError {}

impl From<DomainError> for SubscriptionError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => SubscriptionError::InvalidInput {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::PaymentProviderError | ErrorCode::ScraperError => {
                SubscriptionError::Upstream(err.message)
            }
            _ => SubscriptionError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for SubscriptionError {
    fn from(err: ValidationError) -> Self {
        let field = match &err {
            ValidationError::EmptyField { field }
            | ValidationError::InvalidFormat { field, .. } => field.clone(),
        };
        SubscriptionError::InvalidInput {
            field,
            message: err.to_string(),
        }
    }
}
