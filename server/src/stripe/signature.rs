//! Webhook signature verification.
//!
//! Stripe signs the raw body: the `stripe-signature` header carries
//! `t=<unix>,v1=<hex>` (possibly several `v1` entries during secret rolls),
//! and the signed payload is `"{t}.{body}"` HMAC-SHA256'd with the webhook
//! secret. Verification is the sole authentication for the endpoint.

use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Maximum allowed clock skew between the header timestamp and now.
pub const TOLERANCE_SECS: i64 = 300;

/// Verifies the signature header against the raw payload.
///
/// `now_unix` is passed in so callers (and tests) control the clock. Any
/// malformed header, stale timestamp, or mismatching digest yields `false`.
pub fn verify_signature(secret: &str, payload: &[u8], header: &str, now_unix: i64) -> bool {
    let mut timestamp: Option<i64> = None;
    let mut candidates: Vec<&str> = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse().ok(),
            Some(("v1", value)) => candidates.push(value),
            _ => {}
        }
    }

    let (Some(timestamp), false) = (timestamp, candidates.is_empty()) else {
        return false;
    };

    if (now_unix - timestamp).abs() > TOLERANCE_SECS {
        return false;
    }

    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);

    candidates.iter().any(|candidate| {
        hex::decode(candidate)
            .ok()
            .map(|digest| mac.clone().verify_slice(&digest).is_ok())
            .unwrap_or(false)
    })
}
