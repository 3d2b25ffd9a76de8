//! HTTP handlers for subscription, access, and payment webhook endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::adapters::http::app_state::AppState;
use crate::adapters::http::error::{ApiError, ErrorEnvelope, WebhookApiError};
use crate::application::handlers::subscription::{
    CheckAccessQuery, CreateOrderCommand, CreateSubscriptionCommand, GetSubscriptionQuery,
    HandlePaypalWebhookCommand, HandleRazorpayWebhookCommand,
};
use crate::domain::foundation::UserId;
use crate::domain::subscription::{SubscriptionError, WebhookError, RAZORPAY_SIGNATURE_HEADER};
use crate::ports::WebhookTransmission;

use super::dto::{
    CheckAccessParams, CheckAccessResponse, CreateOrderRequest, CreateOrderResponse,
    CreateSubscriptionRequest, CreateSubscriptionResponse, SubscriptionManagementResponse,
    SubscriptionStatusResponse, WebhookAckResponse,
};

fn require_user_id(user_id: Option<UserId>) -> Result<UserId, SubscriptionError> {
    user_id.ok_or_else(|| SubscriptionError::invalid_input("user_id", "User ID required"))
}

fn parse_path_user_id(raw: &str) -> Result<UserId, SubscriptionError> {
    raw.parse()
        .map_err(|_| SubscriptionError::invalid_input("user_id", "Invalid user_id"))
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/crawl/check-access?user_id= - Gate check with lazy trial creation
///
/// Every reply, failures included, carries the `access` flag.
pub async fn check_access(
    State(state): State<AppState>,
    Query(params): Query<CheckAccessParams>,
) -> Response {
    let user_id = match params.user_id.as_deref().map(str::parse::<UserId>) {
        Some(Ok(user_id)) => user_id,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(CheckAccessResponse::invalid_user_id()),
            )
                .into_response()
        }
    };

    match state
        .check_access_handler()
        .handle(CheckAccessQuery { user_id })
        .await
    {
        Ok(result) => Json(CheckAccessResponse::from(result)).into_response(),
        Err(e) => {
            tracing::error!(user_id = %user_id, code = %e.code(), error = %e, "access check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(CheckAccessResponse::internal_error()),
            )
                .into_response()
        }
    }
}

/// GET /api/subscription/status/:user_id - Raw subscription status
pub async fn get_subscription_status(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = parse_path_user_id(&user_id).map_err(ApiError::plain)?;

    let result = state
        .get_subscription_handler()
        .handle(GetSubscriptionQuery { user_id })
        .await
        .map_err(ApiError::plain)?;

    Ok(Json(SubscriptionStatusResponse::from(result)))
}

/// GET /api/crawl/subscription/:user_id - Subscription management view
pub async fn get_subscription_management(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = parse_path_user_id(&user_id).map_err(ApiError::plain)?;

    let result = state
        .get_subscription_handler()
        .handle(GetSubscriptionQuery { user_id })
        .await
        .map_err(ApiError::plain)?;

    Ok(Json(SubscriptionManagementResponse::from(result)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/subscription/create - Start a provider subscription
///
/// Also mounted at `/api/crawl/verify-payment`.
pub async fn create_subscription(
    State(state): State<AppState>,
    payload: Result<Json<CreateSubscriptionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload
        .map_err(|e| ApiError::from_json_rejection(e, ErrorEnvelope::SuccessFlag))?;
    let user_id = require_user_id(request.user_id).map_err(ApiError::success_flag)?;

    let result = state
        .create_subscription_handler()
        .handle(CreateSubscriptionCommand {
            user_id,
            email: request.email,
        })
        .await
        .map_err(ApiError::success_flag)?;

    Ok(Json(CreateSubscriptionResponse::from(result)))
}

/// POST /api/crawl/create-order - Create a one-off checkout order
pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload
        .map_err(|e| ApiError::from_json_rejection(e, ErrorEnvelope::SuccessFlag))?;
    let user_id = require_user_id(request.user_id).map_err(ApiError::success_flag)?;

    let result = state
        .create_order_handler()
        .handle(CreateOrderCommand {
            user_id,
            amount: request.amount,
        })
        .await
        .map_err(ApiError::success_flag)?;

    Ok(Json(CreateOrderResponse::from(result)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Webhook Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /verification - Razorpay webhook (HMAC-signed body)
pub async fn handle_razorpay_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, WebhookApiError> {
    let signature = headers
        .get(RAZORPAY_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let outcome = state
        .razorpay_webhook_handler()
        .handle(HandleRazorpayWebhookCommand {
            payload: body.to_vec(),
            signature,
        })
        .await?;

    tracing::debug!(?outcome, "razorpay webhook processed");
    Ok(Json(WebhookAckResponse::success()))
}

pub const PAYPAL_AUTH_ALGO_HEADER: &str = "paypal-auth-algo";
pub const PAYPAL_CERT_URL_HEADER: &str = "paypal-cert-url";
pub const PAYPAL_TRANSMISSION_ID_HEADER: &str = "paypal-transmission-id";
pub const PAYPAL_TRANSMISSION_SIG_HEADER: &str = "paypal-transmission-sig";
pub const PAYPAL_TRANSMISSION_TIME_HEADER: &str = "paypal-transmission-time";

/// Collects PayPal's transmission headers; all five are required.
///
/// Header names are matched case-insensitively.
fn paypal_transmission(headers: &HeaderMap) -> Result<WebhookTransmission, WebhookError> {
    let header = |name: &'static str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or_else(|| WebhookError::VerificationFailed(format!("Missing {} header", name)))
    };

    Ok(WebhookTransmission {
        auth_algo: header(PAYPAL_AUTH_ALGO_HEADER)?,
        cert_url: header(PAYPAL_CERT_URL_HEADER)?,
        transmission_id: header(PAYPAL_TRANSMISSION_ID_HEADER)?,
        transmission_sig: header(PAYPAL_TRANSMISSION_SIG_HEADER)?,
        transmission_time: header(PAYPAL_TRANSMISSION_TIME_HEADER)?,
    })
}

/// POST /api/webhooks/paypal - PayPal webhook (verified remotely)
pub async fn handle_paypal_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, WebhookApiError> {
    let transmission = paypal_transmission(&headers)?;

    let outcome = state
        .paypal_webhook_handler()
        .handle(HandlePaypalWebhookCommand {
            payload: body.to_vec(),
            transmission,
        })
        .await?;

    Ok(Json(WebhookAckResponse::for_paypal(&outcome)))
}
