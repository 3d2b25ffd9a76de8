//! Validity evaluation for subscription records.
//!
//! Both functions are pure: they take the clock as an argument and never
//! touch storage. The access gate persists whatever reconciliation changes.

use crate::domain::foundation::Timestamp;

use super::{SubscriptionRecord, SubscriptionStatus};

/// Whether the record grants access at `now`.
///
/// Active subscriptions are always valid. Trials are valid strictly before
/// `trial_end`; at the boundary instant the trial has already ended.
pub fn is_valid(record: &SubscriptionRecord, now: Timestamp) -> bool {
    match record.status {
        SubscriptionStatus::Active => true,
        SubscriptionStatus::Trial => record.trial_end.is_after(&now),
        SubscriptionStatus::Expired | SubscriptionStatus::Cancelled => false,
    }
}

/// True when a trial record has reached its end and must be expired.
pub fn trial_has_lapsed(record: &SubscriptionRecord, now: Timestamp) -> bool {
    record.status.is_trial() && !record.trial_end.is_after(&now)
}
