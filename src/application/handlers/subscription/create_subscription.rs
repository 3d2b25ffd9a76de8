//! CreateSubscriptionHandler - start a recurring subscription at the provider.
//!
//! No local record is written here. The record flips to active when the
//! provider's payment webhook arrives carrying the user id stored in notes.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::subscription::SubscriptionError;
use crate::ports::{CreateSubscriptionRequest, PaymentGateway};

/// Email sent to the provider when the client supplies none.
pub const DEFAULT_CUSTOMER_EMAIL: &str = "user@odin.com";

#[derive(Debug, Clone)]
pub struct CreateSubscriptionCommand {
    pub user_id: UserId,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSubscriptionResult {
    pub subscription_id: String,
    pub status: String,
    pub subscription_link: String,
    pub redirect_url: String,
}

pub struct CreateSubscriptionHandler {
    gateway: Arc<dyn PaymentGateway>,
    subscription_link: String,
}

impl CreateSubscriptionHandler {
    pub fn new(gateway: Arc<dyn PaymentGateway>, subscription_link: impl Into<String>) -> Self {
        Self {
            gateway,
            subscription_link: subscription_link.into(),
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateSubscriptionCommand,
    ) -> Result<CreateSubscriptionResult, SubscriptionError> {
        let email = cmd
            .email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| DEFAULT_CUSTOMER_EMAIL.to_string());

        let subscription = self
            .gateway
            .create_subscription(CreateSubscriptionRequest {
                user_id: cmd.user_id,
                email,
            })
            .await
            .map_err(|e| {
                tracing::error!(user_id = %cmd.user_id, error = %e, "subscription creation failed");
                SubscriptionError::upstream(e.message)
            })?;

        tracing::info!(
            user_id = %cmd.user_id,
            subscription_id = %subscription.id,
            "provider subscription created"
        );

        Ok(CreateSubscriptionResult {
            redirect_url: format!("{}?subscription_id={}", self.subscription_link, subscription.id),
            subscription_link: self.subscription_link.clone(),
            subscription_id: subscription.id,
            status: subscription.status,
        })
    }
}
