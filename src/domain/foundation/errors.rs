//! Error types shared across the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors raised while constructing value objects or changing state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation
    ValidationFailed,

    // Lookup
    SubscriptionNotFound,

    // Authorization
    AccessDenied,

    // Concurrency
    ConcurrentModification,

    // Upstream
    PaymentProviderError,
    ScraperError,

    // Infrastructure
    DatabaseError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::SubscriptionNotFound => "SUBSCRIPTION_NOT_FOUND",
            ErrorCode::AccessDenied => "ACCESS_DENIED",
            ErrorCode::ConcurrentModification => "CONCURRENT_MODIFICATION",
            ErrorCode::PaymentProviderError => "PAYMENT_PROVIDER_ERROR",
            ErrorCode::ScraperError => "SCRAPER_ERROR",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Shorthand for a database failure with the driver message attached.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// True when an optimistic write lost a race and may be retried after a reload.
    pub fn is_conflict(&self) -> bool {
        matches!(self.code, ErrorCode::ConcurrentModification)
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        DomainError::new(ErrorCode::ValidationFailed, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_format_names_field_and_reason() {
        let err = ValidationError::invalid_format("user_id", "must be an integer");
        assert_eq!(
            format!("{}", err),
            "Field 'user_id' has invalid format: must be an integer"
        );
    }

    #[test]
    fn every_error_code_has_a_distinct_label() {
        let codes = [
            ErrorCode::ValidationFailed,
            ErrorCode::SubscriptionNotFound,
            ErrorCode::AccessDenied,
            ErrorCode::ConcurrentModification,
            ErrorCode::PaymentProviderError,
            ErrorCode::ScraperError,
            ErrorCode::DatabaseError,
        ];
        let labels: std::collections::HashSet<String> =
            codes.iter().map(|code| code.to_string()).collect();
        assert_eq!(labels.len(), codes.len());
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::new(ErrorCode::SubscriptionNotFound, "no such subscription");
        assert_eq!(
            format!("{}", err),
            "[SUBSCRIPTION_NOT_FOUND] no such subscription"
        );
    }

    #[test]
    fn domain_error_with_detail_adds_detail() {
        let err = DomainError::database("connection reset").with_detail("user_id", "42");
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.details.get("user_id"), Some(&"42".to_string()));
    }

    #[test]
    fn only_concurrent_modification_is_a_conflict() {
        assert!(DomainError::new(ErrorCode::ConcurrentModification, "stale").is_conflict());
        assert!(!DomainError::database("down").is_conflict());
    }

    #[test]
    fn validation_error_converts_to_domain_error() {
        let err: DomainError = ValidationError::empty_field("url").into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(err.message.contains("url"));
    }
}
