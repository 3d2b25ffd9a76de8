//! Shared application state for the HTTP adapter.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

use crate::application::handlers::crawl::CrawlHandler;
use crate::application::handlers::subscription::{
    CheckAccessHandler, CreateOrderHandler, CreateSubscriptionHandler, GetSubscriptionHandler,
    HandlePaypalWebhookHandler, HandleRazorpayWebhookHandler, OrderSettings,
};
use crate::domain::subscription::TrialPolicy;
use crate::ports::{ContentScraper, PaymentGateway, RemoteWebhookVerifier, SubscriptionRepository};

/// Non-port settings the handlers need.
#[derive(Clone)]
pub struct BillingSettings {
    pub trial_policy: TrialPolicy,
    /// Hosted checkout page clients are redirected to.
    pub subscription_link: String,
    pub razorpay_webhook_secret: SecretString,
    pub order: OrderSettings,
}

/// Shared application state containing all dependencies.
///
/// Cloned per request; every dependency is Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub subscription_repository: Arc<dyn SubscriptionRepository>,
    pub payment_gateway: Arc<dyn PaymentGateway>,
    pub paypal_verifier: Arc<dyn RemoteWebhookVerifier>,
    pub content_scraper: Arc<dyn ContentScraper>,
    pub settings: Arc<BillingSettings>,
}

impl AppState {
    pub fn check_access_handler(&self) -> CheckAccessHandler {
        CheckAccessHandler::new(
            self.subscription_repository.clone(),
            self.settings.trial_policy,
        )
    }

    pub fn get_subscription_handler(&self) -> GetSubscriptionHandler {
        GetSubscriptionHandler::new(self.subscription_repository.clone())
    }

    pub fn create_subscription_handler(&self) -> CreateSubscriptionHandler {
        CreateSubscriptionHandler::new(
            self.payment_gateway.clone(),
            self.settings.subscription_link.clone(),
        )
    }

    pub fn create_order_handler(&self) -> CreateOrderHandler {
        CreateOrderHandler::new(self.payment_gateway.clone(), self.settings.order.clone())
    }

    pub fn razorpay_webhook_handler(&self) -> HandleRazorpayWebhookHandler {
        HandleRazorpayWebhookHandler::new(
            self.subscription_repository.clone(),
            self.settings.razorpay_webhook_secret.expose_secret().as_str(),
        )
    }

    pub fn paypal_webhook_handler(&self) -> HandlePaypalWebhookHandler {
        HandlePaypalWebhookHandler::new(
            self.subscription_repository.clone(),
            self.paypal_verifier.clone(),
        )
    }

    pub fn crawl_handler(&self) -> CrawlHandler {
        CrawlHandler::new(
            self.subscription_repository.clone(),
            self.content_scraper.clone(),
            self.settings.trial_policy,
        )
    }
}
