//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `SubscriptionRepository` - per-user subscription persistence
//! - `PaymentGateway` - outbound subscription and order creation
//! - `RemoteWebhookVerifier` - provider-side webhook confirmation
//! - `ContentScraper` - page scraping and web search

mod content_scraper;
mod payment_gateway;
mod remote_webhook_verifier;
mod subscription_repository;

pub use content_scraper::{ContentScraper, PageContent, ScrapeError};
pub use payment_gateway::{
    CreateOrderRequest, CreateSubscriptionRequest, PaymentError, PaymentErrorCode,
    PaymentGateway, ProviderOrder, ProviderSubscription,
};
pub use remote_webhook_verifier::{RemoteWebhookVerifier, WebhookTransmission};
pub use subscription_repository::SubscriptionRepository;
