//! Strongly-typed identifier value objects.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Identifier of an end user of the crawler.
///
/// Users are numbered by the account system. Clients send the id either as a
/// JSON number or as a numeric string (payment-provider notes are always
/// strings), so deserialization accepts both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("user_id"));
        }
        trimmed
            .parse::<i64>()
            .map(Self)
            .map_err(|_| ValidationError::invalid_format("user_id", "must be an integer"))
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(Self(n)),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Provider-assigned identifier of a paid subscription.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(String);

impl SubscriptionId {
    /// Creates a new SubscriptionId, returning error if blank.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("subscription_id"));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_deserializes_from_number() {
        let id: UserId = serde_json::from_str("42").unwrap();
        assert_eq!(id.as_i64(), 42);
    }

    #[test]
    fn user_id_deserializes_from_numeric_string() {
        let id: UserId = serde_json::from_str("\" 17 \"").unwrap();
        assert_eq!(id, UserId::new(17));
    }

    #[test]
    fn user_id_rejects_non_numeric_string() {
        let result: Result<UserId, _> = serde_json::from_str("\"abc\"");
        assert!(result.is_err());
    }

    #[test]
    fn user_id_from_str_rejects_empty() {
        match "  ".parse::<UserId>() {
            Err(ValidationError::EmptyField { field }) => assert_eq!(field, "user_id"),
            other => panic!("Expected EmptyField error, got {:?}", other),
        }
    }

    #[test]
    fn user_id_serializes_as_number() {
        assert_eq!(serde_json::to_string(&UserId::new(9)).unwrap(), "9");
    }

    #[test]
    fn subscription_id_rejects_blank() {
        assert!(SubscriptionId::new("   ").is_err());
    }

    #[test]
    fn subscription_id_displays_inner_value() {
        let id = SubscriptionId::new("sub_Abc123").unwrap();
        assert_eq!(format!("{}", id), "sub_Abc123");
    }
}
