//! User model: identity plus the integer credit balance mutated by the ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Expected to stay >= 0; enforced by the ledger's conditional debit,
    /// not by the schema.
    pub credits: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Creates an active user with a generated UUID and the given starting credits.
    pub fn new(name: String, email: String, credits: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            credits,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
