//! Axum router configuration for subscription endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::http::app_state::AppState;

use super::handlers::{
    check_access, create_order, create_subscription, get_subscription_management,
    get_subscription_status, handle_paypal_webhook, handle_razorpay_webhook,
};

/// Create the subscription API router.
///
/// # Routes
/// - `POST /create` - Start a provider subscription
/// - `GET /status/:user_id` - Raw subscription status
pub fn subscription_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_subscription))
        .route("/status/:user_id", get(get_subscription_status))
}

/// Billing routes the crawler frontend calls under `/api/crawl`.
///
/// # Routes
/// - `GET /check-access` - Access gate
/// - `POST /create-order` - One-off order
/// - `POST /verify-payment` - Same as `/api/subscription/create`
/// - `GET /subscription/:user_id` - Management view
pub fn crawl_billing_routes() -> Router<AppState> {
    Router::new()
        .route("/check-access", get(check_access))
        .route("/create-order", post(create_order))
        .route("/verify-payment", post(create_subscription))
        .route("/subscription/:user_id", get(get_subscription_management))
}

/// Provider webhook routes.
///
/// Unauthenticated; each handler verifies its provider's signature.
/// Razorpay posts to `/verification` at the root, PayPal to `/api/webhooks/paypal`.
pub fn webhook_routes() -> Router<AppState> {
    Router::new()
        .route("/verification", post(handle_razorpay_webhook))
        .route("/api/webhooks/paypal", post(handle_paypal_webhook))
}
