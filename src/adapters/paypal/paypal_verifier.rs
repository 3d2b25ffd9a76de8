//! PayPal webhook verification through the provider API.
//!
//! Each delivery costs two calls: an OAuth client-credentials token request,
//! then `verify-webhook-signature` with the transmission headers and the
//! event body as received.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::domain::subscription::WebhookError;
use crate::ports::{RemoteWebhookVerifier, WebhookTransmission};

const DEFAULT_API_BASE_URL: &str = "https://api-m.paypal.com";

/// Status PayPal reports for a genuine delivery.
const VERIFICATION_SUCCESS: &str = "SUCCESS";

#[derive(Clone)]
pub struct PaypalConfig {
    client_id: SecretString,
    client_secret: SecretString,

    /// Webhook the deliveries were registered under.
    webhook_id: String,

    /// Base URL for the API (default: https://api-m.paypal.com).
    api_base_url: String,
}

impl PaypalConfig {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        webhook_id: impl Into<String>,
    ) -> Self {
        Self {
            client_id: SecretString::new(client_id.into()),
            client_secret: SecretString::new(client_secret.into()),
            webhook_id: webhook_id.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// Set a custom API base URL (for testing or the sandbox).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

/// Verifies PayPal webhooks by asking PayPal.
pub struct PaypalWebhookVerifier {
    config: PaypalConfig,
    http_client: reqwest::Client,
}

impl PaypalWebhookVerifier {
    pub fn new(config: PaypalConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    async fn access_token(&self) -> Result<String, WebhookError> {
        let url = format!("{}/v1/oauth2/token", self.config.api_base_url);

        let response = self
            .http_client
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .basic_auth(
                self.config.client_id.expose_secret(),
                Some(self.config.client_secret.expose_secret()),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| WebhookError::TokenUnavailable(e.to_string()))?;

        if response.status() != reqwest::StatusCode::OK {
            let status = response.status().as_u16();
            tracing::error!(status, "PayPal token request rejected");
            return Err(WebhookError::TokenUnavailable(format!(
                "token endpoint returned {}",
                status
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| WebhookError::TokenUnavailable(e.to_string()))?;
        Ok(token.access_token)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
struct VerifySignatureBody<'a> {
    auth_algo: &'a str,
    cert_url: &'a str,
    transmission_id: &'a str,
    transmission_sig: &'a str,
    transmission_time: &'a str,
    webhook_id: &'a str,
    webhook_event: &'a RawValue,
}

#[derive(Debug, Deserialize)]
struct VerifySignatureResponse {
    #[serde(default)]
    verification_status: Option<String>,
}

#[async_trait]
impl RemoteWebhookVerifier for PaypalWebhookVerifier {
    async fn verify(
        &self,
        transmission: &WebhookTransmission,
        event: &RawValue,
    ) -> Result<(), WebhookError> {
        let token = self.access_token().await?;
        let url = format!(
            "{}/v1/notifications/verify-webhook-signature",
            self.config.api_base_url
        );

        let body = VerifySignatureBody {
            auth_algo: &transmission.auth_algo,
            cert_url: &transmission.cert_url,
            transmission_id: &transmission.transmission_id,
            transmission_sig: &transmission.transmission_sig,
            transmission_time: &transmission.transmission_time,
            webhook_id: &self.config.webhook_id,
            webhook_event: event,
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| WebhookError::Upstream(e.to_string()))?;

        if response.status() != reqwest::StatusCode::OK {
            let status = response.status().as_u16();
            tracing::warn!(
                status,
                transmission_id = %transmission.transmission_id,
                "PayPal rejected verification request"
            );
            return Err(WebhookError::VerificationFailed(format!(
                "verification endpoint returned {}",
                status
            )));
        }

        let verdict: VerifySignatureResponse = response
            .json()
            .await
            .map_err(|e| WebhookError::VerificationFailed(e.to_string()))?;

        match verdict.verification_status.as_deref() {
            Some(VERIFICATION_SUCCESS) => Ok(()),
            other => {
                tracing::warn!(
                    status = ?other,
                    transmission_id = %transmission.transmission_id,
                    "PayPal webhook signature not confirmed"
                );
                Err(WebhookError::VerificationFailed(
                    "Invalid webhook signature".to_string(),
                ))
            }
        }
    }
}
