//! Transaction model: one credit-purchase attempt, pending until reconciled.
//!
//! `is_paid` has a single legal transition (false → true), performed only by
//! [`crate::TransactionRepository::settle`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The two states a transaction can be in. The only legal transition is
/// `Pending -> Paid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionState {
    Pending,
    Paid,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    pub user_id: String,
    pub plan_id: String,
    /// Price charged externally, in the payment provider's currency units.
    pub amount: f64,
    /// Credits granted to the user when the transaction settles.
    pub credits: i64,
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
}

impl TransactionRecord {
    pub fn state(&self) -> TransactionState {
        if self.is_paid {
            TransactionState::Paid
        } else {
            TransactionState::Pending
        }
    }

    /// Creates a pending (unpaid) transaction with a generated UUID.
    pub fn pending(user_id: String, plan_id: String, amount: f64, credits: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            plan_id,
            amount,
            credits,
            is_paid: false,
            created_at: Utc::now(),
        }
    }
}
