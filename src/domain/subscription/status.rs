//! Subscription status state machine.

use crate::domain::foundation::{StateMachine, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a user's crawler subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Free trial, valid until `trial_end`.
    Trial,

    /// Paid subscription. Valid regardless of `trial_end`.
    Active,

    /// Trial lapsed or the provider ended the subscription. No access.
    Expired,

    /// Cancelled at the provider. No access.
    Cancelled,
}

impl SubscriptionStatus {
    pub const ALL: [SubscriptionStatus; 4] = [
        SubscriptionStatus::Trial,
        SubscriptionStatus::Active,
        SubscriptionStatus::Expired,
        SubscriptionStatus::Cancelled,
    ];

    /// Storage and wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Trial => "trial",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Expired => "expired",
            SubscriptionStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_trial(&self) -> bool {
        matches!(self, SubscriptionStatus::Trial)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, SubscriptionStatus::Active)
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trial" => Ok(SubscriptionStatus::Trial),
            "active" => Ok(SubscriptionStatus::Active),
            "expired" => Ok(SubscriptionStatus::Expired),
            "cancelled" => Ok(SubscriptionStatus::Cancelled),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown subscription status '{}'", other),
            )),
        }
    }
}

impl StateMachine for SubscriptionStatus {
    // Provider events may arrive in any order, so every edge is open except
    // the downgrade of a paid subscription back into trial. Self-edges keep
    // redelivered events idempotent.
    fn can_transition_to(&self, target: &Self) -> bool {
        use SubscriptionStatus::*;
        !matches!((self, target), (Active, Trial))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|target| self.can_transition_to(target))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_cannot_fall_back_to_trial() {
        let result = SubscriptionStatus::Active.transition_to(SubscriptionStatus::Trial);
        assert!(result.is_err());
    }

    #[test]
    fn expired_trial_can_restart_trial() {
        assert_eq!(
            SubscriptionStatus::Expired.transition_to(SubscriptionStatus::Trial),
            Ok(SubscriptionStatus::Trial)
        );
    }

    #[test]
    fn cancelled_can_be_reactivated() {
        assert!(SubscriptionStatus::Cancelled.can_transition_to(&SubscriptionStatus::Active));
    }

    #[test]
    fn every_status_may_repeat_itself() {
        for status in SubscriptionStatus::ALL {
            assert!(status.can_transition_to(&status), "{:?} -> itself", status);
        }
    }

    #[test]
    fn no_status_is_terminal() {
        for status in SubscriptionStatus::ALL {
            assert!(!status.is_terminal());
        }
    }

    #[test]
    fn active_lists_three_targets() {
        assert_eq!(
            SubscriptionStatus::Active.valid_transitions(),
            vec![
                SubscriptionStatus::Active,
                SubscriptionStatus::Expired,
                SubscriptionStatus::Cancelled
            ]
        );
    }

    #[test]
    fn string_form_parses_back() {
        for status in SubscriptionStatus::ALL {
            assert_eq!(status.as_str().parse::<SubscriptionStatus>(), Ok(status));
        }
    }

    #[test]
    fn unknown_string_is_rejected() {
        assert!("paused".parse::<SubscriptionStatus>().is_err());
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&SubscriptionStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
    }
}
