//! Outcome shared by the provider webhook handlers.

use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::domain::subscription::{
    SubscriptionRecord, SubscriptionStatus, Transition, TransitionOutcome, WebhookError,
};
use crate::ports::SubscriptionRepository;

use super::record_store::write_with_retry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// The record moved between statuses (or picked up a subscription id).
    Applied {
        user_id: UserId,
        from: SubscriptionStatus,
        to: SubscriptionStatus,
    },
    /// A new record was created by the event.
    Created {
        user_id: UserId,
        status: SubscriptionStatus,
    },
    /// Redelivery of an event that was already reflected.
    Unchanged { user_id: UserId },
    /// Refused by a guard; the record keeps its status.
    Guarded {
        user_id: UserId,
        current: SubscriptionStatus,
    },
    /// Acknowledged with no state change.
    Ignored { reason: String },
}

impl WebhookOutcome {
    pub fn ignored(reason: impl Into<String>) -> Self {
        WebhookOutcome::Ignored {
            reason: reason.into(),
        }
    }
}

pub(crate) fn database_error(err: DomainError) -> WebhookError {
    WebhookError::Database(err.to_string())
}

/// Applies a transition to a stored record with conflict retries.
pub(crate) async fn apply_transition(
    repo: &dyn SubscriptionRepository,
    record: SubscriptionRecord,
    transition: &Transition,
    now: Timestamp,
) -> Result<WebhookOutcome, WebhookError> {
    let user_id = record.user_id;
    let (_, outcome) = write_with_retry(repo, record, |r| r.apply(transition, now))
        .await
        .map_err(database_error)?;

    Ok(match outcome {
        TransitionOutcome::Changed { from, to } => {
            tracing::info!(user_id = %user_id, from = %from, to = %to, "subscription transitioned");
            WebhookOutcome::Applied { user_id, from, to }
        }
        TransitionOutcome::Unchanged => WebhookOutcome::Unchanged { user_id },
        TransitionOutcome::Guarded { current } => {
            tracing::info!(user_id = %user_id, current = %current, "transition refused by guard");
            WebhookOutcome::Guarded { user_id, current }
        }
        TransitionOutcome::Ignored => WebhookOutcome::ignored("no transition for event"),
    })
}
