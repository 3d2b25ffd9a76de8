//! Request and response DTOs for subscription endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::subscription::{
    CheckAccessResult, CreateOrderResult, CreateSubscriptionResult, GetSubscriptionResult,
    WebhookOutcome,
};
use crate::domain::foundation::UserId;
use crate::domain::subscription::{AccessDecision, SubscriptionStatus};

/// Plan name reported by the management endpoint; there is only one.
pub const PLAN_NAME: &str = "premium";

// ════════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/subscription/create` and `POST /api/crawl/verify-payment`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubscriptionRequest {
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Body of `POST /api/crawl/create-order`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Major currency units; the configured default applies when absent.
    #[serde(default)]
    pub amount: Option<f64>,
}

/// Query of `GET /api/crawl/check-access`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckAccessParams {
    #[serde(default)]
    pub user_id: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct CreateSubscriptionResponse {
    pub success: bool,
    pub subscription_id: String,
    pub status: String,
    pub subscription_link: String,
    pub redirect_url: String,
}

impl From<CreateSubscriptionResult> for CreateSubscriptionResponse {
    fn from(result: CreateSubscriptionResult) -> Self {
        Self {
            success: true,
            subscription_id: result.subscription_id,
            status: result.status,
            subscription_link: result.subscription_link,
            redirect_url: result.redirect_url,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderResponse {
    pub success: bool,
    pub order_id: String,
    /// Minor units, as echoed by the provider.
    pub amount: i64,
    pub currency: String,
    pub key: String,
}

impl From<CreateOrderResult> for CreateOrderResponse {
    fn from(result: CreateOrderResult) -> Self {
        Self {
            success: true,
            order_id: result.order_id,
            amount: result.amount,
            currency: result.currency,
            key: result.key,
        }
    }
}

/// `GET /api/subscription/status/{user_id}`.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionStatusResponse {
    pub status: SubscriptionStatus,
    pub subscription_id: Option<String>,
    pub is_active: bool,
    pub trial_end: String,
}

impl From<GetSubscriptionResult> for SubscriptionStatusResponse {
    fn from(result: GetSubscriptionResult) -> Self {
        Self {
            status: result.record.status,
            subscription_id: result
                .record
                .subscription_id
                .as_ref()
                .map(|id| id.as_str().to_string()),
            is_active: result.is_active,
            trial_end: result.record.trial_end.to_rfc3339(),
        }
    }
}

/// `GET /api/crawl/subscription/{user_id}`.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionManagementResponse {
    pub status: SubscriptionStatus,
    pub plan: &'static str,
    pub start_date: String,
    /// Present only while the user is on trial.
    pub trial_end: Option<String>,
    pub is_active: bool,
}

impl From<GetSubscriptionResult> for SubscriptionManagementResponse {
    fn from(result: GetSubscriptionResult) -> Self {
        Self {
            status: result.record.status,
            plan: PLAN_NAME,
            start_date: result.record.created_at.to_rfc3339(),
            trial_end: result.record.visible_trial_end().map(|t| t.to_rfc3339()),
            is_active: result.is_active,
        }
    }
}

/// `GET /api/crawl/check-access`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CheckAccessResponse {
    Granted {
        access: bool,
        is_trial: bool,
        trial_ends: Option<String>,
        status: SubscriptionStatus,
    },
    Denied {
        access: bool,
        is_trial: bool,
        reason: &'static str,
        message: &'static str,
    },
}

impl CheckAccessResponse {
    /// Reply to a request whose user_id could not be parsed.
    pub fn invalid_user_id() -> serde_json::Value {
        serde_json::json!({ "access": false, "reason": "Invalid user_id" })
    }

    /// Reply when the check itself could not run.
    pub fn internal_error() -> serde_json::Value {
        serde_json::json!({ "access": false, "reason": "internal_error" })
    }
}

impl From<CheckAccessResult> for CheckAccessResponse {
    fn from(result: CheckAccessResult) -> Self {
        match result.decision {
            AccessDecision::Granted {
                status,
                is_trial,
                trial_end,
            } => CheckAccessResponse::Granted {
                access: true,
                is_trial,
                trial_ends: trial_end.map(|t| t.to_rfc3339()),
                status,
            },
            AccessDecision::Denied(reason) => CheckAccessResponse::Denied {
                access: false,
                is_trial: false,
                reason: reason.code(),
                message: reason.message(),
            },
        }
    }
}

/// Acknowledgement returned to payment providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookAckResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl WebhookAckResponse {
    pub fn success() -> Self {
        Self {
            status: "success",
            message: None,
        }
    }

    pub fn ignored(message: impl Into<String>) -> Self {
        Self {
            status: "ignored",
            message: Some(message.into()),
        }
    }

    /// PayPal clients distinguish ignored deliveries from applied ones.
    pub fn for_paypal(outcome: &WebhookOutcome) -> Self {
        match outcome {
            WebhookOutcome::Guarded { .. } => {
                Self::ignored("Ignoring trial start for active subscription")
            }
            WebhookOutcome::Ignored { reason } => Self::ignored(reason.clone()),
            WebhookOutcome::Applied { .. }
            | WebhookOutcome::Created { .. }
            | WebhookOutcome::Unchanged { .. } => Self::success(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{SubscriptionId, Timestamp};
    use crate::domain::subscription::{AccessDeniedReason, SubscriptionRecord};
    use serde_json::json;

    fn trial_record() -> SubscriptionRecord {
        SubscriptionRecord::start_trial(UserId::new(5), Timestamp::now(), 3)
    }

    #[test]
    fn create_subscription_request_accepts_string_user_id() {
        let req: CreateSubscriptionRequest =
            serde_json::from_value(json!({ "user_id": "12", "email": "a@b.c" })).unwrap();
        assert_eq!(req.user_id, Some(UserId::new(12)));
    }

    #[test]
    fn create_subscription_request_allows_missing_fields() {
        let req: CreateSubscriptionRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.user_id.is_none());
        assert!(req.email.is_none());
    }

    #[test]
    fn denied_access_serializes_reason_and_message() {
        let response = CheckAccessResponse::from(CheckAccessResult {
            decision: AccessDecision::Denied(AccessDeniedReason::SubscriptionRequired),
            record: trial_record(),
        });

        assert_eq!(
            serde_json::to_value(response).unwrap(),
            json!({
                "access": false,
                "is_trial": false,
                "reason": "subscription_required",
                "message": "Please subscribe to access Odin Crawler"
            })
        );
    }

    #[test]
    fn granted_trial_access_includes_trial_end() {
        let record = trial_record();
        let response = CheckAccessResponse::from(CheckAccessResult {
            decision: AccessDecision::Granted {
                status: SubscriptionStatus::Trial,
                is_trial: true,
                trial_end: Some(record.trial_end),
            },
            record: record.clone(),
        });

        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["access"], true);
        assert_eq!(value["status"], "trial");
        assert_eq!(value["trial_ends"], record.trial_end.to_rfc3339());
    }

    #[test]
    fn management_view_hides_trial_end_once_active() {
        let mut record = trial_record();
        record.status = SubscriptionStatus::Active;
        record.subscription_id = Some(SubscriptionId::new("sub_1").unwrap());

        let response = SubscriptionManagementResponse::from(GetSubscriptionResult {
            record,
            is_active: true,
        });

        assert_eq!(response.plan, "premium");
        assert!(response.trial_end.is_none());
    }

    #[test]
    fn paypal_guarded_outcome_is_ignored_with_message() {
        let ack = WebhookAckResponse::for_paypal(&WebhookOutcome::Guarded {
            user_id: UserId::new(1),
            current: SubscriptionStatus::Active,
        });
        assert_eq!(ack.status, "ignored");
        assert_eq!(
            ack.message.as_deref(),
            Some("Ignoring trial start for active subscription")
        );
    }

    #[test]
    fn success_ack_omits_message() {
        assert_eq!(
            serde_json::to_value(WebhookAckResponse::success()).unwrap(),
            json!({ "status": "success" })
        );
    }
}
