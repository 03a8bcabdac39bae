//! Stripe REST client: checkout-session lookup and creation.
//!
//! Both calls are opaque remote calls with the provider's own timeout/error
//! behavior; nothing here retries.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use storage::TransactionRecord;
use tracing::info;

use super::{CheckoutGateway, SessionMetadata};

const DEFAULT_API_BASE: &str = "https://api.stripe.com";

#[derive(Debug, Deserialize)]
struct SessionList {
    data: Vec<Session>,
}

#[derive(Debug, Deserialize)]
struct Session {
    #[serde(default)]
    metadata: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct CreatedSession {
    url: String,
}

#[derive(Clone)]
pub struct StripeClient {
    http: Arc<reqwest::Client>,
    secret_key: String,
    api_base: String,
}

impl StripeClient {
    pub fn new(secret_key: String) -> Self {
        Self {
            http: Arc::new(reqwest::Client::new()),
            secret_key,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Overrides the API base URL (test servers).
    pub fn with_api_base(mut self, api_base: String) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl CheckoutGateway for StripeClient {
    async fn session_metadata(
        &self,
        payment_intent_id: &str,
    ) -> anyhow::Result<Option<SessionMetadata>> {
        let url = format!("{}/v1/checkout/sessions", self.api_base);

        let list: SessionList = self
            .http
            .get(&url)
            .bearer_auth(&self.secret_key)
            .query(&[("payment_intent", payment_intent_id), ("limit", "1")])
            .send()
            .await
            .context("checkout session lookup failed")?
            .error_for_status()
            .context("checkout session lookup returned an error status")?
            .json()
            .await
            .context("parsing checkout session list")?;

        Ok(list.data.into_iter().next().map(|session| SessionMetadata {
            transaction_id: session.metadata.get("transactionId").cloned(),
            app_id: session.metadata.get("appId").cloned(),
        }))
    }

    async fn create_checkout_session(
        &self,
        transaction: &TransactionRecord,
        app_id: &str,
        plan_name: &str,
        success_url: &str,
        cancel_url: &str,
    ) -> anyhow::Result<String> {
        let url = format!("{}/v1/checkout/sessions", self.api_base);
        let unit_amount = (transaction.amount * 100.0).round() as i64;

        let params = [
            ("mode", "payment".to_string()),
            ("success_url", success_url.to_string()),
            ("cancel_url", cancel_url.to_string()),
            ("line_items[0][quantity]", "1".to_string()),
            (
                "line_items[0][price_data][currency]",
                "usd".to_string(),
            ),
            (
                "line_items[0][price_data][unit_amount]",
                unit_amount.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]",
                plan_name.to_string(),
            ),
            ("metadata[transactionId]", transaction.id.clone()),
            ("metadata[appId]", app_id.to_string()),
        ];

        let created: CreatedSession = self
            .http
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .context("checkout session creation failed")?
            .error_for_status()
            .context("checkout session creation returned an error status")?
            .json()
            .await
            .context("parsing created checkout session")?;

        info!(
            transaction_id = %transaction.id,
            plan = %plan_name,
            "Created checkout session"
        );
        Ok(created.url)
    }
}
