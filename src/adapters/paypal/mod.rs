//! PayPal webhook verification adapter.
//!
//! PayPal deliveries carry no shared-secret HMAC; authenticity is confirmed
//! by calling PayPal's verification API with the transmission headers.

mod paypal_verifier;

pub use paypal_verifier::{PaypalConfig, PaypalWebhookVerifier};
