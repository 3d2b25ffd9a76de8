//! HandleRazorpayWebhookHandler - HMAC-signed Razorpay events.
//!
//! Events are correlated by the `user_id` stored in notes when the
//! subscription was created, falling back to the subscription id. Activation
//! events for an unknown user create the record directly as active.

use std::sync::Arc;

use crate::domain::foundation::Timestamp;
use crate::domain::subscription::{
    EventCategory, RazorpayWebhookVerifier, SubscriptionRecord, Transition, WebhookError,
};
use crate::ports::SubscriptionRepository;

use super::webhook_outcome::{apply_transition, database_error, WebhookOutcome};

#[derive(Debug, Clone)]
pub struct HandleRazorpayWebhookCommand {
    /// Raw request body, exactly as signed.
    pub payload: Vec<u8>,
    /// `X-Razorpay-Signature` header value.
    pub signature: Option<String>,
}

pub struct HandleRazorpayWebhookHandler {
    repository: Arc<dyn SubscriptionRepository>,
    verifier: RazorpayWebhookVerifier,
}

impl HandleRazorpayWebhookHandler {
    pub fn new(repository: Arc<dyn SubscriptionRepository>, webhook_secret: impl Into<String>) -> Self {
        Self {
            repository,
            verifier: RazorpayWebhookVerifier::new(webhook_secret),
        }
    }

    pub async fn handle(
        &self,
        cmd: HandleRazorpayWebhookCommand,
    ) -> Result<WebhookOutcome, WebhookError> {
        let event = self
            .verifier
            .verify_and_parse(&cmd.payload, cmd.signature.as_deref())
            .map_err(|e| {
                tracing::warn!(error = %e, "razorpay webhook rejected");
                e
            })?;

        let category = event.category();
        tracing::info!(event = %event.event, ?category, "razorpay webhook received");

        if !category.is_recognized() {
            return Ok(WebhookOutcome::ignored(format!("unhandled event {}", event.event)));
        }

        let user_id = event.user_id();
        let subscription_id = event.subscription_id();

        if category == EventCategory::PaymentCaptured
            && (user_id.is_none() || subscription_id.is_none())
        {
            return Ok(WebhookOutcome::ignored("payment not linked to a subscription"));
        }

        let repo = self.repository.as_ref();
        let now = Timestamp::now();
        let transition = Transition::new(category, subscription_id.clone());

        let record = match (user_id, &subscription_id) {
            (Some(user_id), _) => match repo.find_by_user_id(user_id).await.map_err(database_error)? {
                Some(record) => record,
                None => match (&subscription_id, category.creates_missing_record()) {
                    (Some(id), true) => {
                        let fresh = SubscriptionRecord::start_active(user_id, id.clone(), now);
                        let stored = repo.insert_if_absent(&fresh).await.map_err(database_error)?;
                        if stored == fresh {
                            tracing::info!(user_id = %user_id, subscription_id = %id, "subscription record created from payment");
                            return Ok(WebhookOutcome::Created {
                                user_id,
                                status: stored.status,
                            });
                        }
                        stored
                    }
                    _ => return Err(WebhookError::SubscriptionNotFound),
                },
            },
            (None, Some(id)) => repo
                .find_by_subscription_id(id)
                .await
                .map_err(database_error)?
                .ok_or(WebhookError::SubscriptionNotFound)?,
            (None, None) => return Err(WebhookError::MissingSubscriptionId),
        };

        apply_transition(repo, record, &transition, now).await
    }
}
