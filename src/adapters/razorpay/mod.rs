//! Razorpay payment gateway adapter.
//!
//! Creates subscriptions and orders through the Razorpay REST API. Webhook
//! signature checks live in the domain (`RazorpayWebhookVerifier`) since they
//! need no network access.
//!
//! # Configuration
//!
//! Read from `ODIN_CRAWLER__PAYMENT__RAZORPAY__*`:
//! - `KEY_ID` / `KEY_SECRET`: API credentials
//! - `PLAN_ID`: plan every subscription is created on

mod mock_payment_gateway;
mod razorpay_adapter;

pub use mock_payment_gateway::MockPaymentGateway;
pub use razorpay_adapter::{RazorpayConfig, RazorpayGateway, DEFAULT_TOTAL_COUNT};
