//! Razorpay webhook event types.
//!
//! Only the fields used to correlate an event with a subscription record are
//! captured; everything else in the payload is ignored.

use crate::domain::foundation::{SubscriptionId, UserId};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use super::transition::EventCategory;

/// Free-form `notes` attached to Razorpay entities.
///
/// Razorpay sends `[]` instead of `{}` when no notes were set, so both shapes
/// deserialize to a map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RazorpayNotes(HashMap<String, serde_json::Value>);

impl RazorpayNotes {
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// `user_id` note, accepted as a number or a numeric string.
    pub fn user_id(&self) -> Option<UserId> {
        self.get("user_id")
            .and_then(|value| serde_json::from_value::<UserId>(value.clone()).ok())
    }
}

impl<'de> Deserialize<'de> for RazorpayNotes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Map(HashMap<String, serde_json::Value>),
            List(serde::de::IgnoredAny),
            Null,
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Map(map) => RazorpayNotes(map),
            Raw::List(_) | Raw::Null => RazorpayNotes::default(),
        })
    }
}

/// Razorpay wraps every entity in `{ "entity": { ... } }`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RazorpayEntity<T> {
    pub entity: T,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RazorpayPayment {
    pub id: String,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub subscription_id: Option<String>,
    #[serde(default)]
    pub notes: RazorpayNotes,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RazorpaySubscription {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: RazorpayNotes,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RazorpayPayload {
    #[serde(default)]
    pub payment: Option<RazorpayEntity<RazorpayPayment>>,
    #[serde(default)]
    pub subscription: Option<RazorpayEntity<RazorpaySubscription>>,
}

/// Top-level Razorpay webhook body.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RazorpayWebhookEvent {
    /// Event name, e.g. `payment.captured`.
    pub event: String,

    #[serde(default)]
    pub payload: RazorpayPayload,

    #[serde(default)]
    pub created_at: Option<i64>,
}

impl RazorpayWebhookEvent {
    pub fn category(&self) -> EventCategory {
        match self.event.as_str() {
            "payment.captured" | "subscription.charged" => EventCategory::PaymentCaptured,
            "subscription.activated" => EventCategory::Activated,
            "subscription.cancelled" => EventCategory::Cancelled,
            "subscription.completed" | "subscription.halted" => EventCategory::Expired,
            _ => EventCategory::Unrecognized,
        }
    }

    fn payment(&self) -> Option<&RazorpayPayment> {
        self.payload.payment.as_ref().map(|p| &p.entity)
    }

    fn subscription(&self) -> Option<&RazorpaySubscription> {
        self.payload.subscription.as_ref().map(|s| &s.entity)
    }

    /// User id from the payment notes, falling back to the subscription notes.
    pub fn user_id(&self) -> Option<UserId> {
        self.payment()
            .and_then(|p| p.notes.user_id())
            .or_else(|| self.subscription().and_then(|s| s.notes.user_id()))
    }

    /// Subscription id from the payment, falling back to the subscription entity.
    pub fn subscription_id(&self) -> Option<SubscriptionId> {
        self.payment()
            .and_then(|p| p.subscription_id.as_deref())
            .or_else(|| self.subscription().map(|s| s.id.as_str()))
            .and_then(|id| SubscriptionId::new(id).ok())
    }
}
