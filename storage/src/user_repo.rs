//! User repository and credit ledger.
//!
//! All balance mutations in the system go through [`UserRepository::debit`]
//! and [`UserRepository::credit`]; both are single conditional UPDATEs so two
//! concurrent callers can never drive a balance below zero or lose an
//! increment.

use crate::error::StorageError;
use crate::models::UserRecord;
use crate::sqlite_pool::SqlitePoolManager;
use tracing::{info, warn};

#[derive(Clone)]
pub struct UserRepository {
    pool_manager: SqlitePoolManager,
}

impl UserRepository {
    pub async fn new(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                credits INTEGER NOT NULL,
                is_active BOOLEAN NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn save(&self, user: &UserRecord) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, credits, is_active, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.credits)
        .bind(user.is_active)
        .bind(user.created_at)
        .execute(pool)
        .await?;

        info!(user_id = %user.id, credits = user.credits, "Saved user");
        Ok(())
    }

    pub async fn find_by_id(&self, user_id: &str) -> Result<Option<UserRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let user = sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    /// Debits `amount` credits if the balance covers it.
    ///
    /// Returns `false` (no mutation) when the balance is insufficient. The
    /// balance check and the decrement are one UPDATE, so a concurrent debit
    /// cannot slip between them.
    pub async fn debit(
        &self,
        user_id: &str,
        amount: i64,
        reason: &str,
    ) -> Result<bool, StorageError> {
        let pool = self.pool_manager.pool();

        let result =
            sqlx::query("UPDATE users SET credits = credits - ? WHERE id = ? AND credits >= ?")
                .bind(amount)
                .bind(user_id)
                .bind(amount)
                .execute(pool)
                .await?;

        let debited = result.rows_affected() == 1;
        if debited {
            info!(user_id = %user_id, amount, reason, "Debited credits");
        } else {
            warn!(user_id = %user_id, amount, reason, "Debit refused, insufficient balance");
        }

        Ok(debited)
    }

    /// Credits `amount` to the user's balance.
    pub async fn credit(
        &self,
        user_id: &str,
        amount: i64,
        reason: &str,
    ) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        let result = sqlx::query("UPDATE users SET credits = credits + ? WHERE id = ?")
            .bind(amount)
            .bind(user_id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("user {}", user_id)));
        }

        info!(user_id = %user_id, amount, reason, "Credited credits");
        Ok(())
    }
}
