//! Razorpay REST adapter.
//!
//! Implements `PaymentGateway` against the Razorpay v1 API. Requests are
//! authenticated with HTTP basic auth using the key id and key secret.
//!
//! # Configuration
//!
//! ```ignore
//! let config = RazorpayConfig::new(key_id, key_secret, plan_id);
//! let gateway = RazorpayGateway::new(config);
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::ports::{
    CreateOrderRequest, CreateSubscriptionRequest, PaymentError, PaymentErrorCode, PaymentGateway,
    ProviderOrder, ProviderSubscription,
};

const DEFAULT_API_BASE_URL: &str = "https://api.razorpay.com";

/// Billing cycles requested for a new subscription.
pub const DEFAULT_TOTAL_COUNT: u32 = 12;

/// Razorpay API configuration.
#[derive(Clone)]
pub struct RazorpayConfig {
    key_id: SecretString,
    key_secret: SecretString,

    /// Plan every crawler subscription is created on.
    plan_id: String,

    /// Number of billing cycles before the subscription completes.
    total_count: u32,

    /// Base URL for the API (default: https://api.razorpay.com).
    api_base_url: String,
}

impl RazorpayConfig {
    pub fn new(
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
        plan_id: impl Into<String>,
    ) -> Self {
        Self {
            key_id: SecretString::new(key_id.into()),
            key_secret: SecretString::new(key_secret.into()),
            plan_id: plan_id.into(),
            total_count: DEFAULT_TOTAL_COUNT,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_total_count(mut self, total_count: u32) -> Self {
        self.total_count = total_count;
        self
    }

    pub fn plan_id(&self) -> &str {
        &self.plan_id
    }
}

/// Razorpay payment gateway.
pub struct RazorpayGateway {
    config: RazorpayConfig,
    http_client: reqwest::Client,
}

impl RazorpayGateway {
    pub fn new(config: RazorpayConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Sends an authenticated JSON POST and decodes the success body.
    async fn post<B, R>(&self, path: &str, body: &B, operation: &str) -> Result<R, PaymentError>
    where
        B: Serialize + ?Sized,
        R: for<'de> Deserialize<'de>,
    {
        let url = format!("{}{}", self.config.api_base_url, path);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(
                self.config.key_id.expose_secret(),
                Some(self.config.key_secret.expose_secret()),
            )
            .json(body)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(
                operation,
                status = status.as_u16(),
                error = %error_text,
                "Razorpay request failed"
            );
            return Err(map_error_response(status, &error_text));
        }

        response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Razorpay response: {}", e))
        })
    }
}

#[derive(Debug, Serialize)]
struct SubscriptionBody<'a> {
    plan_id: &'a str,
    total_count: u32,
    customer_notify: u8,
    notes: SubscriptionNotes<'a>,
}

#[derive(Debug, Serialize)]
struct SubscriptionNotes<'a> {
    user_id: String,
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct OrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
    notes: OrderNotes,
}

#[derive(Debug, Serialize)]
struct OrderNotes {
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct RazorpaySubscriptionResponse {
    id: String,
    status: String,
    #[serde(default)]
    short_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RazorpayOrderResponse {
    id: String,
    amount: i64,
    currency: String,
}

#[derive(Debug, Deserialize)]
struct RazorpayErrorEnvelope {
    error: RazorpayErrorBody,
}

#[derive(Debug, Deserialize)]
struct RazorpayErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

fn map_error_response(status: reqwest::StatusCode, body: &str) -> PaymentError {
    let parsed = serde_json::from_str::<RazorpayErrorEnvelope>(body).ok();
    let description = parsed
        .as_ref()
        .and_then(|e| e.error.description.clone())
        .unwrap_or_else(|| format!("Razorpay API error ({})", status.as_u16()));

    let code = match status.as_u16() {
        401 | 403 => PaymentErrorCode::AuthenticationError,
        400 | 404 | 422 => PaymentErrorCode::InvalidRequest,
        _ => PaymentErrorCode::ProviderError,
    };

    let error = PaymentError::new(code, description);
    match parsed.and_then(|e| e.error.code) {
        Some(provider_code) => error.with_provider_code(provider_code),
        None => error,
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    async fn create_subscription(
        &self,
        request: CreateSubscriptionRequest,
    ) -> Result<ProviderSubscription, PaymentError> {
        let body = SubscriptionBody {
            plan_id: &self.config.plan_id,
            total_count: self.config.total_count,
            customer_notify: 1,
            notes: SubscriptionNotes {
                user_id: request.user_id.to_string(),
                email: &request.email,
            },
        };

        let created: RazorpaySubscriptionResponse = self
            .post("/v1/subscriptions", &body, "create_subscription")
            .await?;

        Ok(ProviderSubscription {
            id: created.id,
            status: created.status,
            short_url: created.short_url,
        })
    }

    async fn create_order(&self, request: CreateOrderRequest) -> Result<ProviderOrder, PaymentError> {
        let body = OrderBody {
            amount: request.amount,
            currency: &request.currency,
            receipt: &request.receipt,
            notes: OrderNotes {
                user_id: request.user_id.to_string(),
            },
        };

        let created: RazorpayOrderResponse =
            self.post("/v1/orders", &body, "create_order").await?;

        Ok(ProviderOrder {
            id: created.id,
            amount: created.amount,
            currency: created.currency,
        })
    }
}
