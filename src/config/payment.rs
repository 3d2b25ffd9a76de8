//! Payment provider configuration (Razorpay, PayPal)

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    pub razorpay: RazorpaySettings,
    pub paypal: PaypalSettings,
}

impl PaymentConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.razorpay.validate()?;
        self.paypal.validate()
    }
}

/// Razorpay credentials and checkout settings
#[derive(Debug, Clone, Deserialize)]
pub struct RazorpaySettings {
    /// Public key id (`rzp_test_...` or `rzp_live_...`)
    pub key_id: String,

    pub key_secret: SecretString,

    /// Secret configured on the Razorpay webhook
    pub webhook_secret: SecretString,

    /// Plan every subscription is created on
    pub plan_id: String,

    /// Hosted subscription page clients are redirected to
    pub subscription_link: String,

    /// Billing cycles per subscription
    #[serde(default = "default_total_count")]
    pub total_count: u32,

    #[serde(default = "default_currency")]
    pub currency: String,

    /// Order amount in minor units when the client sends none
    #[serde(default = "default_order_amount")]
    pub default_order_amount: i64,

    #[serde(default = "default_razorpay_base_url")]
    pub api_base_url: String,
}

impl RazorpaySettings {
    pub fn is_test_mode(&self) -> bool {
        self.key_id.starts_with("rzp_test_")
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.key_id.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__RAZORPAY__KEY_ID"));
        }
        if !self.key_id.starts_with("rzp_") {
            return Err(ValidationError::InvalidRazorpayKey);
        }
        if self.key_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__RAZORPAY__KEY_SECRET"));
        }
        if self.webhook_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired(
                "PAYMENT__RAZORPAY__WEBHOOK_SECRET",
            ));
        }
        if self.plan_id.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__RAZORPAY__PLAN_ID"));
        }
        require_http_url(&self.subscription_link, "payment.razorpay.subscription_link")?;
        require_http_url(&self.api_base_url, "payment.razorpay.api_base_url")?;
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::InvalidCurrency(self.currency.clone()));
        }
        if self.total_count == 0 {
            return Err(ValidationError::OutOfRange("payment.razorpay.total_count"));
        }
        if self.default_order_amount <= 0 {
            return Err(ValidationError::OutOfRange(
                "payment.razorpay.default_order_amount",
            ));
        }
        Ok(())
    }
}

/// PayPal credentials for webhook verification
#[derive(Debug, Clone, Deserialize)]
pub struct PaypalSettings {
    pub client_id: String,
    pub client_secret: SecretString,
    /// Id of the webhook registered in the PayPal dashboard
    pub webhook_id: String,

    #[serde(default = "default_paypal_base_url")]
    pub api_base_url: String,
}

impl PaypalSettings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.client_id.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__PAYPAL__CLIENT_ID"));
        }
        if self.client_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired(
                "PAYMENT__PAYPAL__CLIENT_SECRET",
            ));
        }
        if self.webhook_id.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__PAYPAL__WEBHOOK_ID"));
        }
        require_http_url(&self.api_base_url, "payment.paypal.api_base_url")
    }
}

pub(super) fn require_http_url(value: &str, field: &'static str) -> Result<(), ValidationError> {
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(ValidationError::InvalidUrl(field)),
    }
}

fn default_total_count() -> u32 {
    12
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_order_amount() -> i64 {
    100
}

fn default_razorpay_base_url() -> String {
    "https://api.razorpay.com".to_string()
}

fn default_paypal_base_url() -> String {
    "https://api-m.paypal.com".to_string()
}
