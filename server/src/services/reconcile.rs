//! Payment reconciliation: matches succeeded-payment events to pending
//! transactions and grants credits exactly once.
//!
//! Everything that is not a fault acknowledges cleanly; the provider retries
//! on non-2xx, and an idempotent no-op must not trigger those retries.

use std::sync::Arc;

use chat_core::{AppError, Result};
use storage::TransactionRepository;
use tracing::{info, warn};

use crate::stripe::{CheckoutGateway, WebhookEvent};

#[derive(Clone)]
pub struct ReconcileService {
    transactions: TransactionRepository,
    checkout: Arc<dyn CheckoutGateway>,
    app_id: String,
}

impl ReconcileService {
    pub fn new(
        transactions: TransactionRepository,
        checkout: Arc<dyn CheckoutGateway>,
        app_id: String,
    ) -> Self {
        Self {
            transactions,
            checkout,
            app_id,
        }
    }

    /// Handles one signature-verified event.
    ///
    /// `Ok(())` means "acknowledge": acted on, ignored on purpose, or a benign
    /// no-op (already paid, unknown session, foreign app). `Err` is reserved
    /// for faults worth a retry from the provider.
    pub async fn handle_event(&self, event: WebhookEvent) -> Result<()> {
        match event {
            WebhookEvent::PaymentIntentSucceeded { payment_intent_id } => {
                self.reconcile_payment(&payment_intent_id).await
            }
            WebhookEvent::Other(kind) => {
                info!(kind = %kind, "Unhandled event type");
                Ok(())
            }
        }
    }

    async fn reconcile_payment(&self, payment_intent_id: &str) -> Result<()> {
        let metadata = self
            .checkout
            .session_metadata(payment_intent_id)
            .await
            .map_err(|e| AppError::Provider(e.to_string()))?;

        let Some(metadata) = metadata else {
            // Without the session metadata the event can never be completed;
            // acknowledging is the non-retryable choice.
            warn!(
                payment_intent = %payment_intent_id,
                "No checkout session found for payment intent"
            );
            return Ok(());
        };

        if metadata.app_id.as_deref() != Some(self.app_id.as_str()) {
            info!(
                payment_intent = %payment_intent_id,
                app_id = ?metadata.app_id,
                "Ignored event: invalid app"
            );
            return Ok(());
        }

        let Some(transaction_id) = metadata.transaction_id else {
            warn!(
                payment_intent = %payment_intent_id,
                "Checkout session has no transaction id"
            );
            return Ok(());
        };

        match self
            .transactions
            .settle(&transaction_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(settled) => {
                info!(
                    transaction_id = %transaction_id,
                    user_id = %settled.user_id,
                    credits = settled.credits,
                    "Transaction marked as paid"
                );
            }
            None => {
                warn!(
                    transaction_id = %transaction_id,
                    "Transaction not found or already paid"
                );
            }
        }

        Ok(())
    }
}
