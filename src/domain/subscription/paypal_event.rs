//! PayPal webhook event types.

use crate::domain::foundation::SubscriptionId;
use serde::{Deserialize, Serialize};

use super::transition::EventCategory;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PaypalResource {
    /// Billing subscription id (`I-...`).
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// PayPal webhook body (simplified).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaypalWebhookEvent {
    /// Event id (`WH-...`).
    #[serde(default)]
    pub id: Option<String>,

    pub event_type: String,

    #[serde(default)]
    pub resource: PaypalResource,
}

impl PaypalWebhookEvent {
    pub fn category(&self) -> EventCategory {
        match self.event_type.as_str() {
            "BILLING.SUBSCRIPTION.ACTIVATED" | "BILLING.SUBSCRIPTION.CREATED" => {
                EventCategory::Activated
            }
            "BILLING.SUBSCRIPTION.CANCELLED" => EventCategory::Cancelled,
            "BILLING.SUBSCRIPTION.EXPIRED" => EventCategory::Expired,
            "BILLING.SUBSCRIPTION.TRIAL_STARTED" => EventCategory::TrialStarted,
            _ => EventCategory::Unrecognized,
        }
    }

    pub fn subscription_id(&self) -> Option<SubscriptionId> {
        self.resource
            .id
            .as_deref()
            .and_then(|id| SubscriptionId::new(id).ok())
    }
}
