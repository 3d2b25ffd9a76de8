//! HandlePaypalWebhookHandler - PayPal billing events.
//!
//! PayPal events are confirmed by calling PayPal back before anything in the
//! body is trusted. Records are looked up by the billing subscription id;
//! unknown ids are reported and never create records.

use std::sync::Arc;

use serde_json::value::RawValue;

use crate::domain::foundation::Timestamp;
use crate::domain::subscription::{PaypalWebhookEvent, Transition, WebhookError};
use crate::ports::{RemoteWebhookVerifier, SubscriptionRepository, WebhookTransmission};

use super::webhook_outcome::{apply_transition, database_error, WebhookOutcome};

#[derive(Debug, Clone)]
pub struct HandlePaypalWebhookCommand {
    pub payload: Vec<u8>,
    pub transmission: WebhookTransmission,
}

pub struct HandlePaypalWebhookHandler {
    repository: Arc<dyn SubscriptionRepository>,
    verifier: Arc<dyn RemoteWebhookVerifier>,
}

impl HandlePaypalWebhookHandler {
    pub fn new(
        repository: Arc<dyn SubscriptionRepository>,
        verifier: Arc<dyn RemoteWebhookVerifier>,
    ) -> Self {
        Self {
            repository,
            verifier,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaypalWebhookCommand,
    ) -> Result<WebhookOutcome, WebhookError> {
        // Kept as raw text: PayPal checks the event exactly as it was sent.
        let body: Box<RawValue> = serde_json::from_slice(&cmd.payload)
            .map_err(|e| WebhookError::ParseError(e.to_string()))?;

        self.verifier
            .verify(&cmd.transmission, &body)
            .await
            .map_err(|e| {
                tracing::warn!(
                    transmission_id = %cmd.transmission.transmission_id,
                    error = %e,
                    "paypal webhook rejected"
                );
                e
            })?;

        let event: PaypalWebhookEvent =
            serde_json::from_str(body.get()).map_err(|e| WebhookError::ParseError(e.to_string()))?;
        let category = event.category();
        tracing::info!(event_type = %event.event_type, ?category, "paypal webhook received");

        if !category.is_recognized() {
            return Ok(WebhookOutcome::ignored(format!(
                "unhandled event {}",
                event.event_type
            )));
        }

        let subscription_id = event
            .subscription_id()
            .ok_or(WebhookError::MissingSubscriptionId)?;

        let repo = self.repository.as_ref();
        let record = repo
            .find_by_subscription_id(&subscription_id)
            .await
            .map_err(database_error)?
            .ok_or_else(|| {
                tracing::warn!(subscription_id = %subscription_id, "paypal event for unknown subscription");
                WebhookError::SubscriptionNotFound
            })?;

        let transition = Transition::new(category, Some(subscription_id));
        apply_transition(repo, record, &transition, Timestamp::now()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySubscriptionRepository;
    use crate::domain::foundation::{SubscriptionId, UserId};
    use crate::domain::subscription::{SubscriptionRecord, SubscriptionStatus};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct MockVerifier {
        result: fn() -> Result<(), WebhookError>,
        seen: Mutex<Vec<String>>,
    }

    impl MockVerifier {
        fn accepting() -> Self {
            Self {
                result: || Ok(()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn rejecting() -> Self {
            Self {
                result: || Err(WebhookError::VerificationFailed("FAILURE".into())),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RemoteWebhookVerifier for MockVerifier {
        async fn verify(
            &self,
            _transmission: &WebhookTransmission,
            event: &RawValue,
        ) -> Result<(), WebhookError> {
            self.seen.lock().unwrap().push(event.get().to_string());
            (self.result)()
        }
    }

    fn transmission() -> WebhookTransmission {
        WebhookTransmission {
            auth_algo: "SHA256withRSA".into(),
            cert_url: "https://api.paypal.com/cert".into(),
            transmission_id: "tx-1".into(),
            transmission_sig: "sig".into(),
            transmission_time: "2024-01-01T00:00:00Z".into(),
        }
    }

    fn cmd(event_type: &str, resource_id: Option<&str>) -> HandlePaypalWebhookCommand {
        let mut body = json!({ "id": "WH-1", "event_type": event_type, "resource": {} });
        if let Some(id) = resource_id {
            body["resource"]["id"] = json!(id);
        }
        HandlePaypalWebhookCommand {
            payload: serde_json::to_vec(&body).unwrap(),
            transmission: transmission(),
        }
    }

    async fn seeded(status: SubscriptionStatus) -> Arc<InMemorySubscriptionRepository> {
        let repo = Arc::new(InMemorySubscriptionRepository::new());
        let mut record = SubscriptionRecord::start_trial(UserId::new(1), Timestamp::now(), 3);
        record.subscription_id = Some(SubscriptionId::new("I-1").unwrap());
        record.status = status;
        repo.seed(record).await;
        repo
    }

    fn handler(
        repo: Arc<InMemorySubscriptionRepository>,
        verifier: MockVerifier,
    ) -> HandlePaypalWebhookHandler {
        HandlePaypalWebhookHandler::new(repo, Arc::new(verifier))
    }

    async fn status_of(repo: &InMemorySubscriptionRepository) -> SubscriptionStatus {
        repo.find_by_user_id(UserId::new(1)).await.unwrap().unwrap().status
    }

    #[tokio::test]
    async fn activation_marks_record_active() {
        let repo = seeded(SubscriptionStatus::Trial).await;
        let outcome = handler(repo.clone(), MockVerifier::accepting())
            .handle(cmd("BILLING.SUBSCRIPTION.ACTIVATED", Some("I-1")))
            .await
            .unwrap();

        assert!(matches!(outcome, WebhookOutcome::Applied { .. }));
        assert_eq!(status_of(&repo).await, SubscriptionStatus::Active);
    }

    #[tokio::test]
    async fn trial_started_does_not_downgrade_active() {
        let repo = seeded(SubscriptionStatus::Active).await;
        let outcome = handler(repo.clone(), MockVerifier::accepting())
            .handle(cmd("BILLING.SUBSCRIPTION.TRIAL_STARTED", Some("I-1")))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            WebhookOutcome::Guarded {
                user_id: UserId::new(1),
                current: SubscriptionStatus::Active
            }
        );
        assert_eq!(status_of(&repo).await, SubscriptionStatus::Active);
        assert_eq!(repo.write_count(), 0);
    }

    #[tokio::test]
    async fn trial_started_on_cancelled_returns_to_trial() {
        let repo = seeded(SubscriptionStatus::Cancelled).await;
        handler(repo.clone(), MockVerifier::accepting())
            .handle(cmd("BILLING.SUBSCRIPTION.TRIAL_STARTED", Some("I-1")))
            .await
            .unwrap();

        assert_eq!(status_of(&repo).await, SubscriptionStatus::Trial);
    }

    #[tokio::test]
    async fn cancelled_and_expired_are_distinct() {
        let repo = seeded(SubscriptionStatus::Active).await;
        let h = handler(repo.clone(), MockVerifier::accepting());

        h.handle(cmd("BILLING.SUBSCRIPTION.CANCELLED", Some("I-1"))).await.unwrap();
        assert_eq!(status_of(&repo).await, SubscriptionStatus::Cancelled);

        h.handle(cmd("BILLING.SUBSCRIPTION.EXPIRED", Some("I-1"))).await.unwrap();
        assert_eq!(status_of(&repo).await, SubscriptionStatus::Expired);
    }

    #[tokio::test]
    async fn rejected_verification_mutates_nothing() {
        let repo = seeded(SubscriptionStatus::Trial).await;
        let result = handler(repo.clone(), MockVerifier::rejecting())
            .handle(cmd("BILLING.SUBSCRIPTION.ACTIVATED", Some("I-1")))
            .await;

        assert!(matches!(result, Err(WebhookError::VerificationFailed(_))));
        assert_eq!(status_of(&repo).await, SubscriptionStatus::Trial);
    }

    #[tokio::test]
    async fn unknown_subscription_is_not_found() {
        let repo = Arc::new(InMemorySubscriptionRepository::new());
        let result = handler(repo.clone(), MockVerifier::accepting())
            .handle(cmd("BILLING.SUBSCRIPTION.ACTIVATED", Some("I-404")))
            .await;

        assert!(matches!(result, Err(WebhookError::SubscriptionNotFound)));
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn missing_resource_id_is_bad_request() {
        let repo = seeded(SubscriptionStatus::Trial).await;
        let result = handler(repo, MockVerifier::accepting())
            .handle(cmd("BILLING.SUBSCRIPTION.ACTIVATED", None))
            .await;

        assert!(matches!(result, Err(WebhookError::MissingSubscriptionId)));
    }

    #[tokio::test]
    async fn unrecognized_event_is_acknowledged() {
        let repo = seeded(SubscriptionStatus::Trial).await;
        let outcome = handler(repo.clone(), MockVerifier::accepting())
            .handle(cmd("PAYMENT.SALE.COMPLETED", Some("I-1")))
            .await
            .unwrap();

        assert!(matches!(outcome, WebhookOutcome::Ignored { .. }));
        assert_eq!(repo.write_count(), 0);
    }

    #[tokio::test]
    async fn body_is_forwarded_verbatim_to_verifier() {
        let repo = seeded(SubscriptionStatus::Trial).await;
        let verifier = Arc::new(MockVerifier::accepting());
        let h = HandlePaypalWebhookHandler::new(repo, verifier.clone());
        // Unsorted keys and odd spacing must survive untouched.
        let raw = r#"{"id":"WH-1", "event_version":"1.0","resource_type":"subscription","event_type":"BILLING.SUBSCRIPTION.ACTIVATED","resource":{"id":"I-1"}}"#;

        h.handle(HandlePaypalWebhookCommand {
            payload: raw.as_bytes().to_vec(),
            transmission: transmission(),
        })
        .await
        .unwrap();

        assert_eq!(verifier.seen.lock().unwrap()[0], raw);
    }

    #[tokio::test]
    async fn invalid_json_is_parse_error() {
        let repo = seeded(SubscriptionStatus::Trial).await;
        let result = handler(repo, MockVerifier::accepting())
            .handle(HandlePaypalWebhookCommand {
                payload: b"{nope".to_vec(),
                transmission: transmission(),
            })
            .await;

        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }
}
