//! Razorpay webhook signature verification.
//!
//! Razorpay signs the raw request body with HMAC-SHA256 using the webhook
//! secret and sends the hex digest in `X-Razorpay-Signature`.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::razorpay_event::RazorpayWebhookEvent;
use super::webhook_errors::WebhookError;

/// Header carrying the body signature.
pub const RAZORPAY_SIGNATURE_HEADER: &str = "X-Razorpay-Signature";

pub struct RazorpayWebhookVerifier {
    secret: String,
}

impl RazorpayWebhookVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Checks the signature over the exact bytes received.
    ///
    /// # Errors
    ///
    /// - `MissingSignature` - no header value
    /// - `InvalidSignature` - header is not hex or does not match
    pub fn verify(&self, payload: &[u8], signature: Option<&str>) -> Result<(), WebhookError> {
        let signature = signature
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(WebhookError::MissingSignature)?;

        let provided = hex::decode(signature).map_err(|_| WebhookError::InvalidSignature)?;
        let expected = self.compute_signature(payload);

        if !constant_time_compare(&expected, &provided) {
            return Err(WebhookError::InvalidSignature);
        }
        Ok(())
    }

    /// Verifies the signature, then parses the body.
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<RazorpayWebhookEvent, WebhookError> {
        self.verify(payload, signature)?;
        serde_json::from_slice(payload).map_err(|e| WebhookError::ParseError(e.to_string()))
    }

    fn compute_signature(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac =
            Hmac::<Sha256>::new_from_slice(self.secret.as_bytes()).expect("HMAC accepts any key");
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}

fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Hex HMAC-SHA256 of `payload`, as Razorpay would send it.
pub fn sign_payload(secret: &str, payload: &[u8]) -> String {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}
