//! Subscription record aggregate.
//!
//! One record per user. Records are created lazily by the first access check
//! (as a trial) or by a provider activation event (as active), and are never
//! deleted.
//!
//! # Invariants
//!
//! - `user_id` is unique across records
//! - `created_at` never changes after construction
//! - `updated_at` moves on every mutation
//! - status changes go through [`SubscriptionStatus`]'s state machine

use crate::domain::foundation::{StateMachine, SubscriptionId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

use super::transition::{EventCategory, Transition, TransitionOutcome};
use super::{validity, SubscriptionStatus};

/// Days an activation-created record keeps as its nominal `trial_end`.
pub const ACTIVATED_TRIAL_END_DAYS: i64 = 365;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    pub user_id: UserId,

    /// Provider subscription id. Absent while the user is on trial.
    pub subscription_id: Option<SubscriptionId>,

    pub status: SubscriptionStatus,

    /// Only meaningful while `status` is trial.
    pub trial_end: Timestamp,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,

    /// Optimistic concurrency token, bumped by the store on every update.
    pub version: i32,
}

impl SubscriptionRecord {
    /// New trial record for a user seen for the first time.
    pub fn start_trial(user_id: UserId, now: Timestamp, trial_days: i64) -> Self {
        Self {
            user_id,
            subscription_id: None,
            status: SubscriptionStatus::Trial,
            trial_end: now.add_days(trial_days),
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }

    /// New paid record for a user first seen through a provider payment.
    pub fn start_active(user_id: UserId, subscription_id: SubscriptionId, now: Timestamp) -> Self {
        Self {
            user_id,
            subscription_id: Some(subscription_id),
            status: SubscriptionStatus::Active,
            trial_end: now.add_days(ACTIVATED_TRIAL_END_DAYS),
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }

    pub fn is_valid(&self, now: Timestamp) -> bool {
        validity::is_valid(self, now)
    }

    /// Trial end as exposed to clients: present only while on trial.
    pub fn visible_trial_end(&self) -> Option<Timestamp> {
        self.status.is_trial().then_some(self.trial_end)
    }

    /// Expires a lapsed trial. Returns true when the record changed.
    pub fn expire_trial_if_due(&mut self, now: Timestamp) -> bool {
        if !validity::trial_has_lapsed(self, now) {
            return false;
        }
        self.status = SubscriptionStatus::Expired;
        self.updated_at = now;
        true
    }

    /// Applies a classified provider event.
    ///
    /// Activation replaces the provider subscription id with the one on the
    /// event; a captured payment only fills it in when none is recorded yet.
    pub fn apply(&mut self, transition: &Transition, now: Timestamp) -> TransitionOutcome {
        let Some(target) = transition.category.target_status() else {
            return TransitionOutcome::Ignored;
        };

        let from = self.status;
        let to = match from.transition_to(target) {
            Ok(to) => to,
            Err(_) => return TransitionOutcome::Guarded { current: from },
        };

        let next_subscription_id = match (&transition.category, &transition.subscription_id) {
            (EventCategory::Activated, Some(id)) => Some(id.clone()),
            (EventCategory::PaymentCaptured, Some(id)) if self.subscription_id.is_none() => {
                Some(id.clone())
            }
            _ => self.subscription_id.clone(),
        };

        if to == from && next_subscription_id == self.subscription_id {
            return TransitionOutcome::Unchanged;
        }

        self.status = to;
        self.subscription_id = next_subscription_id;
        self.updated_at = now;
        TransitionOutcome::Changed { from, to }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> Timestamp {
        Timestamp::now()
    }

    fn sub(id: &str) -> SubscriptionId {
        SubscriptionId::new(id).unwrap()
    }

    fn trial() -> SubscriptionRecord {
        SubscriptionRecord::start_trial(UserId::new(7), now(), 3)
    }

    fn active() -> SubscriptionRecord {
        SubscriptionRecord::start_active(UserId::new(7), sub("sub_A"), now())
    }

    #[test]
    fn start_trial_sets_end_from_trial_days() {
        let created = now();
        let record = SubscriptionRecord::start_trial(UserId::new(1), created, 3);
        assert_eq!(record.status, SubscriptionStatus::Trial);
        assert_eq!(record.trial_end, created.add_days(3));
        assert!(record.subscription_id.is_none());
        assert!(record.is_valid(created));
    }

    #[test]
    fn start_active_pushes_trial_end_a_year_out() {
        let created = now();
        let record = SubscriptionRecord::start_active(UserId::new(1), sub("sub_X"), created);
        assert_eq!(record.trial_end, created.add_days(365));
        assert_eq!(record.subscription_id, Some(sub("sub_X")));
    }

    #[test]
    fn trial_started_on_active_record_is_guarded() {
        let mut record = active();
        let before = record.clone();
        let outcome = record.apply(&Transition::new(EventCategory::TrialStarted, None), now());
        assert_eq!(
            outcome,
            TransitionOutcome::Guarded {
                current: SubscriptionStatus::Active
            }
        );
        assert_eq!(record, before);
    }

    #[test]
    fn trial_started_on_expired_record_returns_to_trial() {
        let mut record = trial();
        record.status = SubscriptionStatus::Expired;
        let outcome = record.apply(&Transition::new(EventCategory::TrialStarted, None), now());
        assert!(outcome.is_changed());
        assert_eq!(record.status, SubscriptionStatus::Trial);
    }

    #[test]
    fn activating_twice_is_idempotent() {
        let mut record = trial();
        let event = Transition::new(EventCategory::Activated, Some(sub("sub_B")));

        let first = record.apply(&event, now());
        assert_eq!(
            first,
            TransitionOutcome::Changed {
                from: SubscriptionStatus::Trial,
                to: SubscriptionStatus::Active
            }
        );
        let second = record.apply(&event, now());
        assert_eq!(second, TransitionOutcome::Unchanged);
        assert_eq!(record.status, SubscriptionStatus::Active);
    }

    #[test]
    fn payment_captured_keeps_existing_subscription_id() {
        let mut record = active();
        let outcome = record.apply(
            &Transition::new(EventCategory::PaymentCaptured, Some(sub("sub_other"))),
            now(),
        );
        assert_eq!(outcome, TransitionOutcome::Unchanged);
        assert_eq!(record.subscription_id, Some(sub("sub_A")));
    }

    #[test]
    fn payment_captured_fills_missing_subscription_id() {
        let mut record = trial();
        record.apply(
            &Transition::new(EventCategory::PaymentCaptured, Some(sub("sub_new"))),
            now(),
        );
        assert_eq!(record.status, SubscriptionStatus::Active);
        assert_eq!(record.subscription_id, Some(sub("sub_new")));
    }

    #[test]
    fn cancellation_and_expiry_apply_from_active() {
        let mut record = active();
        record.apply(&Transition::new(EventCategory::Cancelled, None), now());
        assert_eq!(record.status, SubscriptionStatus::Cancelled);

        let mut record = active();
        record.apply(&Transition::new(EventCategory::Expired, None), now());
        assert_eq!(record.status, SubscriptionStatus::Expired);
    }

    #[test]
    fn unrecognized_event_leaves_record_untouched() {
        let mut record = trial();
        let before = record.clone();
        let outcome = record.apply(&Transition::new(EventCategory::Unrecognized, None), now());
        assert_eq!(outcome, TransitionOutcome::Ignored);
        assert_eq!(record, before);
    }

    #[test]
    fn mutation_refreshes_updated_at_but_not_created_at() {
        let mut record = trial();
        let created = record.created_at;
        let later = now().add_days(1);
        record.apply(&Transition::new(EventCategory::Cancelled, None), later);
        assert_eq!(record.created_at, created);
        assert_eq!(record.updated_at, later);
    }

    #[test]
    fn expire_trial_if_due_only_fires_once() {
        let mut record = trial();
        let after_end = record.trial_end.add_days(1);
        assert!(record.expire_trial_if_due(after_end));
        assert_eq!(record.status, SubscriptionStatus::Expired);
        assert!(!record.expire_trial_if_due(after_end));
    }

    #[test]
    fn visible_trial_end_hidden_once_paid() {
        assert!(trial().visible_trial_end().is_some());
        assert!(active().visible_trial_end().is_none());
    }
}
