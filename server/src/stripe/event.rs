//! Webhook event decoding.
//!
//! The provider's `type` string is decoded into a closed enum with an
//! explicit catch-all arm so unknown kinds are acknowledged and logged rather
//! than silently assumed safe.

use anyhow::Context;
use serde::Deserialize;

/// Application-defined metadata recovered from a checkout session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionMetadata {
    pub transaction_id: Option<String>,
    pub app_id: Option<String>,
}

/// Decoded webhook event. Only succeeded payments are acted on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    PaymentIntentSucceeded { payment_intent_id: String },
    /// Any other event kind; carried for logging.
    Other(String),
}

#[derive(Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    kind: String,
    data: RawEventData,
}

#[derive(Deserialize)]
struct RawEventData {
    object: serde_json::Value,
}

/// Decodes a raw webhook payload into a [`WebhookEvent`].
pub fn parse_event(payload: &[u8]) -> anyhow::Result<WebhookEvent> {
    let raw: RawEvent = serde_json::from_slice(payload).context("malformed event payload")?;

    if raw.kind == "payment_intent.succeeded" {
        let payment_intent_id = raw
            .data
            .object
            .get("id")
            .and_then(|v| v.as_str())
            .context("payment_intent.succeeded event without an object id")?
            .to_string();
        Ok(WebhookEvent::PaymentIntentSucceeded { payment_intent_id })
    } else {
        Ok(WebhookEvent::Other(raw.kind))
    }
}
