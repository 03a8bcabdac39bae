//! Stripe webhook endpoint.
//!
//! Takes the raw body (required for signature verification), rejects bad
//! signatures with 400, and otherwise always acknowledges with
//! `{"received": true}` so the provider does not retry idempotent no-ops.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;
use tracing::{error, warn};

use crate::state::AppState;
use crate::stripe::{parse_event, verify_signature};

pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if !verify_signature(
        &state.config.stripe_webhook_secret,
        &body,
        signature,
        Utc::now().timestamp(),
    ) {
        warn!("Webhook rejected: invalid signature");
        return (StatusCode::BAD_REQUEST, "webhook error: invalid signature").into_response();
    }

    let event = match parse_event(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "Webhook rejected: malformed payload");
            return (StatusCode::BAD_REQUEST, format!("webhook error: {}", e)).into_response();
        }
    };

    match state.reconcile.handle_event(event).await {
        Ok(()) => Json(json!({"received": true})).into_response(),
        Err(e) => {
            error!(error = %e, "Webhook processing error");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}
