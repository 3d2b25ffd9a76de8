//! Mapping of verified provider events onto subscription transitions.
//!
//! Each provider module classifies its own event names into an
//! [`EventCategory`]; the record then applies the resulting [`Transition`].

use crate::domain::foundation::SubscriptionId;

use super::SubscriptionStatus;

/// Provider-neutral classification of a webhook event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    /// Subscription created or activated at the provider.
    Activated,
    Cancelled,
    Expired,
    /// Provider reports a trial period. Must not downgrade a paid record.
    TrialStarted,
    /// Money arrived for a subscription (Razorpay payment or charge).
    PaymentCaptured,
    /// Anything else. Acknowledged without touching state.
    Unrecognized,
}

impl EventCategory {
    /// Status the record should end up in, if the category changes state.
    pub fn target_status(&self) -> Option<SubscriptionStatus> {
        match self {
            EventCategory::Activated | EventCategory::PaymentCaptured => {
                Some(SubscriptionStatus::Active)
            }
            EventCategory::Cancelled => Some(SubscriptionStatus::Cancelled),
            EventCategory::Expired => Some(SubscriptionStatus::Expired),
            EventCategory::TrialStarted => Some(SubscriptionStatus::Trial),
            EventCategory::Unrecognized => None,
        }
    }

    /// Whether a missing record may be created from this event.
    pub fn creates_missing_record(&self) -> bool {
        matches!(self, EventCategory::Activated | EventCategory::PaymentCaptured)
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, EventCategory::Unrecognized)
    }
}

/// A classified event together with the subscription id it carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub category: EventCategory,
    pub subscription_id: Option<SubscriptionId>,
}

impl Transition {
    pub fn new(category: EventCategory, subscription_id: Option<SubscriptionId>) -> Self {
        Self {
            category,
            subscription_id,
        }
    }
}

/// Result of applying a transition to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The record was mutated and must be persisted.
    Changed {
        from: SubscriptionStatus,
        to: SubscriptionStatus,
    },
    /// The event was valid but the record already reflected it.
    Unchanged,
    /// A guard refused the transition (trial started on an active record).
    Guarded { current: SubscriptionStatus },
    /// The category does not map to any transition.
    Ignored,
}

impl TransitionOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, TransitionOutcome::Changed { .. })
    }
}
