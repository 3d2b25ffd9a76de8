//! Port for webhook schemes verified by calling the provider back.

use crate::domain::subscription::WebhookError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// Transmission headers PayPal attaches to every webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookTransmission {
    pub auth_algo: String,
    pub cert_url: String,
    pub transmission_id: String,
    pub transmission_sig: String,
    pub transmission_time: String,
}

#[async_trait]
pub trait RemoteWebhookVerifier: Send + Sync {
    /// Confirms the event with the provider.
    ///
    /// `event` is the delivered JSON text; it is forwarded byte for byte.
    ///
    /// # Errors
    ///
    /// - `TokenUnavailable` if the provider token could not be obtained
    /// - `VerificationFailed` if the provider did not confirm the event
    /// - `Upstream` on transport failure
    async fn verify(
        &self,
        transmission: &WebhookTransmission,
        event: &RawValue,
    ) -> Result<(), WebhookError>;
}
