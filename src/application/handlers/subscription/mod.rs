//! Subscription handlers.
//!
//! ## Commands
//! - Authorizing protected actions
//! - Creating provider subscriptions and one-off orders
//! - Processing Razorpay and PayPal webhooks
//!
//! ## Queries
//! - Checking access (with lazy trial creation and expiry)
//! - Reading a user's subscription

mod authorize_action;
mod check_access;
mod create_order;
mod create_subscription;
mod get_subscription;
mod handle_paypal_webhook;
mod handle_razorpay_webhook;
pub mod record_store;
mod webhook_outcome;

// Commands
pub use authorize_action::{AuthorizeActionCommand, AuthorizeActionHandler, AuthorizedAction};
pub use create_order::{CreateOrderCommand, CreateOrderHandler, CreateOrderResult, OrderSettings};
pub use create_subscription::{
    CreateSubscriptionCommand, CreateSubscriptionHandler, CreateSubscriptionResult,
    DEFAULT_CUSTOMER_EMAIL,
};
pub use handle_paypal_webhook::{HandlePaypalWebhookCommand, HandlePaypalWebhookHandler};
pub use handle_razorpay_webhook::{HandleRazorpayWebhookCommand, HandleRazorpayWebhookHandler};
pub use webhook_outcome::WebhookOutcome;

// Queries
pub use check_access::{CheckAccessHandler, CheckAccessQuery, CheckAccessResult};
pub use get_subscription::{GetSubscriptionHandler, GetSubscriptionQuery, GetSubscriptionResult};
