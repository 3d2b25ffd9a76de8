//! Access decisions for protected crawler actions.

use crate::domain::foundation::Timestamp;
use serde::Serialize;

use super::{SubscriptionRecord, SubscriptionStatus};

/// Why a user was refused access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDeniedReason {
    /// The trial ran out during this very check.
    TrialExpired,
    /// No valid trial or paid subscription.
    SubscriptionRequired,
}

impl AccessDeniedReason {
    /// Machine-readable code returned to clients.
    pub fn code(&self) -> &'static str {
        match self {
            AccessDeniedReason::TrialExpired => "trial_expired",
            AccessDeniedReason::SubscriptionRequired => "subscription_required",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            AccessDeniedReason::TrialExpired => {
                "Your trial has expired. Please subscribe to continue."
            }
            AccessDeniedReason::SubscriptionRequired => "Please subscribe to access Odin Crawler",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Granted {
        status: SubscriptionStatus,
        is_trial: bool,
        trial_end: Option<Timestamp>,
    },
    Denied(AccessDeniedReason),
}

impl AccessDecision {
    /// Decides access for a record that has already been reconciled.
    ///
    /// `expired_now` reports whether reconciliation just expired the trial,
    /// which surfaces as `trial_expired` rather than the generic reason.
    pub fn evaluate(record: &SubscriptionRecord, now: Timestamp, expired_now: bool) -> Self {
        if expired_now {
            return AccessDecision::Denied(AccessDeniedReason::TrialExpired);
        }
        if record.is_valid(now) {
            return AccessDecision::Granted {
                status: record.status,
                is_trial: record.status.is_trial(),
                trial_end: record.visible_trial_end(),
            };
        }
        AccessDecision::Denied(AccessDeniedReason::SubscriptionRequired)
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted { .. })
    }

    pub fn denial_reason(&self) -> Option<AccessDeniedReason> {
        match self {
            AccessDecision::Denied(reason) => Some(*reason),
            AccessDecision::Granted { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{SubscriptionId, UserId};

    fn trial_record(now: Timestamp) -> SubscriptionRecord {
        SubscriptionRecord::start_trial(UserId::new(3), now, 3)
    }

    #[test]
    fn fresh_trial_is_granted_as_trial() {
        let now = Timestamp::now();
        let record = trial_record(now);
        match AccessDecision::evaluate(&record, now, false) {
            AccessDecision::Granted {
                status,
                is_trial,
                trial_end,
            } => {
                assert_eq!(status, SubscriptionStatus::Trial);
                assert!(is_trial);
                assert_eq!(trial_end, Some(now.add_days(3)));
            }
            other => panic!("expected grant, got {:?}", other),
        }
    }

    #[test]
    fn active_record_is_granted_without_trial_end() {
        let now = Timestamp::now();
        let record =
            SubscriptionRecord::start_active(UserId::new(3), SubscriptionId::new("s").unwrap(), now);
        let decision = AccessDecision::evaluate(&record, now, false);
        assert_eq!(
            decision,
            AccessDecision::Granted {
                status: SubscriptionStatus::Active,
                is_trial: false,
                trial_end: None
            }
        );
    }

    #[test]
    fn just_expired_trial_reports_trial_expired() {
        let now = Timestamp::now();
        let mut record = trial_record(now.minus_days(4));
        let expired_now = record.expire_trial_if_due(now);
        let decision = AccessDecision::evaluate(&record, now, expired_now);
        assert_eq!(decision.denial_reason(), Some(AccessDeniedReason::TrialExpired));
    }

    #[test]
    fn previously_expired_record_requires_subscription() {
        let now = Timestamp::now();
        let mut record = trial_record(now);
        record.status = SubscriptionStatus::Expired;
        let decision = AccessDecision::evaluate(&record, now, false);
        assert_eq!(
            decision.denial_reason(),
            Some(AccessDeniedReason::SubscriptionRequired)
        );
        assert!(!decision.is_granted());
    }

    #[test]
    fn reason_codes_are_snake_case() {
        assert_eq!(AccessDeniedReason::TrialExpired.code(), "trial_expired");
        assert_eq!(
            AccessDeniedReason::SubscriptionRequired.code(),
            "subscription_required"
        );
    }
}
