//! Stripe integration: webhook signature verification, event decoding, and
//! the REST client used for checkout sessions.

mod client;
mod event;
mod signature;

pub use client::StripeClient;
pub use event::{parse_event, SessionMetadata, WebhookEvent};
pub use signature::verify_signature;

use async_trait::async_trait;
use storage::TransactionRecord;

/// Checkout-session operations the reconciliation and purchase paths need.
/// Implemented by [`StripeClient`]; faked in tests.
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    /// Metadata of the checkout session that originated a payment intent, or
    /// `None` when no session matches.
    async fn session_metadata(
        &self,
        payment_intent_id: &str,
    ) -> anyhow::Result<Option<SessionMetadata>>;

    /// Creates a checkout session for a pending transaction; returns the
    /// hosted checkout URL.
    async fn create_checkout_session(
        &self,
        transaction: &TransactionRecord,
        app_id: &str,
        plan_name: &str,
        success_url: &str,
        cancel_url: &str,
    ) -> anyhow::Result<String>;
}
