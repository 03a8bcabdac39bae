//! Transaction repository: pending credit purchases and their settlement.
//!
//! [`TransactionRepository::settle`] is the only way a transaction becomes
//! paid. The pending check and the paid flip are one conditional UPDATE, so a
//! redelivered payment event settles exactly once.

use crate::error::StorageError;
use crate::models::TransactionRecord;
use crate::sqlite_pool::SqlitePoolManager;
use tracing::{error, info, warn};

/// Outcome of a successful settlement: who got how many credits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettledCredit {
    pub user_id: String,
    pub credits: i64,
}

#[derive(Clone)]
pub struct TransactionRepository {
    pool_manager: SqlitePoolManager,
}

impl TransactionRepository {
    pub async fn new(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS transactions (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                plan_id TEXT NOT NULL,
                amount REAL NOT NULL,
                credits INTEGER NOT NULL,
                is_paid BOOLEAN NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn save(&self, transaction: &TransactionRecord) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            INSERT INTO transactions (id, user_id, plan_id, amount, credits, is_paid, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&transaction.id)
        .bind(&transaction.user_id)
        .bind(&transaction.plan_id)
        .bind(transaction.amount)
        .bind(transaction.credits)
        .bind(transaction.is_paid)
        .bind(transaction.created_at)
        .execute(pool)
        .await?;

        info!(
            transaction_id = %transaction.id,
            user_id = %transaction.user_id,
            credits = transaction.credits,
            "Saved pending transaction"
        );
        Ok(())
    }

    pub async fn find_by_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<TransactionRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let transaction =
            sqlx::query_as::<_, TransactionRecord>("SELECT * FROM transactions WHERE id = ?")
                .bind(transaction_id)
                .fetch_optional(pool)
                .await?;

        Ok(transaction)
    }

    /// Settles a pending transaction: flips `is_paid` and credits the user's
    /// balance in one database transaction.
    ///
    /// Returns `None` when the id is unknown or the row is already paid; of
    /// two concurrent deliveries of the same payment event, exactly one gets
    /// `Some`. Callers treat `None` as a benign no-op, not an error.
    ///
    /// A transaction referencing a user that no longer exists is an error and
    /// rolls back, leaving the row pending.
    pub async fn settle(
        &self,
        transaction_id: &str,
    ) -> Result<Option<SettledCredit>, StorageError> {
        let pool = self.pool_manager.pool();
        let mut tx = pool.begin().await?;

        let result = sqlx::query("UPDATE transactions SET is_paid = 1 WHERE id = ? AND is_paid = 0")
            .bind(transaction_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            warn!(transaction_id = %transaction_id, "Transaction not found or already paid");
            return Ok(None);
        }

        let (user_id, credits): (String, i64) =
            sqlx::query_as("SELECT user_id, credits FROM transactions WHERE id = ?")
                .bind(transaction_id)
                .fetch_one(&mut *tx)
                .await?;

        let granted = sqlx::query("UPDATE users SET credits = credits + ? WHERE id = ?")
            .bind(credits)
            .bind(&user_id)
            .execute(&mut *tx)
            .await?;

        if granted.rows_affected() == 0 {
            tx.rollback().await?;
            error!(
                transaction_id = %transaction_id,
                user_id = %user_id,
                "Settlement aborted: transaction references a missing user"
            );
            return Err(StorageError::NotFound(format!(
                "user {} referenced by transaction {}",
                user_id, transaction_id
            )));
        }

        tx.commit().await?;

        info!(
            transaction_id = %transaction_id,
            user_id = %user_id,
            credits,
            "Transaction settled, credits granted"
        );
        Ok(Some(SettledCredit { user_id, credits }))
    }
}
