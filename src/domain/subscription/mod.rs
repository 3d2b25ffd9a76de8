//! Subscription domain module.
//!
//! Trial and paid subscription lifecycle, access decisions, and the
//! payment-provider webhook vocabulary.
//!
//! # Module Structure
//!
//! - `record` - SubscriptionRecord aggregate
//! - `status` - SubscriptionStatus state machine
//! - `validity` - pure validity evaluation and trial lapse detection
//! - `transition` - provider-neutral event categories and outcomes
//! - `access` - access decisions and denial reasons
//! - `trial_policy` - trial length and result caps
//! - `razorpay_event` / `paypal_event` - typed provider payloads
//! - `webhook_verifier` - Razorpay HMAC verification

mod access;
mod errors;
mod paypal_event;
mod razorpay_event;
mod record;
mod status;
mod transition;
mod trial_policy;
pub mod validity;
mod webhook_errors;
mod webhook_verifier;

pub use access::{AccessDecision, AccessDeniedReason};
pub use errors::SubscriptionError;
pub use paypal_event::{PaypalResource, PaypalWebhookEvent};
pub use razorpay_event::{
    RazorpayEntity, RazorpayNotes, RazorpayPayload, RazorpayPayment, RazorpaySubscription,
    RazorpayWebhookEvent,
};
pub use record::{SubscriptionRecord, ACTIVATED_TRIAL_END_DAYS};
pub use status::SubscriptionStatus;
pub use transition::{EventCategory, Transition, TransitionOutcome};
pub use trial_policy::{TrialPolicy, DEFAULT_TRIAL_PERIOD_DAYS, DEFAULT_TRIAL_RESULT_LIMIT};
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{sign_payload, RazorpayWebhookVerifier, RAZORPAY_SIGNATURE_HEADER};
