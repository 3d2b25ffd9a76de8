//! HTTP adapter for subscription endpoints.
//!
//! - `POST /api/subscription/create` - Start a Razorpay subscription
//! - `GET /api/subscription/status/:user_id` - Subscription status
//! - `GET /api/crawl/check-access` - Access gate
//! - `POST /api/crawl/create-order` - One-off Razorpay order
//! - `POST /api/crawl/verify-payment` - Alias of subscription creation
//! - `GET /api/crawl/subscription/:user_id` - Management view
//! - `POST /verification` - Razorpay webhook
//! - `POST /api/webhooks/paypal` - PayPal webhook

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::{crawl_billing_routes, subscription_routes, webhook_routes};
