//! Chat repository: chats and their ordered message lists.
//!
//! Messages are append-only; deletion happens at chat granularity and removes
//! the chat's messages with it.

use crate::error::StorageError;
use crate::models::{ChatRecord, MessageRecord};
use crate::sqlite_pool::SqlitePoolManager;
use chrono::Utc;
use tracing::info;

#[derive(Clone)]
pub struct ChatRepository {
    pool_manager: SqlitePoolManager,
}

impl ChatRepository {
    pub async fn new(pool_manager: SqlitePoolManager) -> Result<Self, StorageError> {
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chats (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                id TEXT PRIMARY KEY,
                chat_id TEXT NOT NULL,
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                is_image BOOLEAN NOT NULL,
                is_published BOOLEAN NOT NULL,
                timestamp TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_chats_user_id ON chats(user_id);
            CREATE INDEX IF NOT EXISTS idx_messages_chat_id ON messages(chat_id);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn save(&self, chat: &ChatRecord) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            INSERT INTO chats (id, user_id, name, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&chat.id)
        .bind(&chat.user_id)
        .bind(&chat.name)
        .bind(chat.created_at)
        .bind(chat.updated_at)
        .execute(pool)
        .await?;

        info!(chat_id = %chat.id, user_id = %chat.user_id, "Saved chat");
        Ok(())
    }

    /// Finds a chat only when it belongs to `user_id`; ownership is part of
    /// the lookup, not a separate check.
    pub async fn find_owned(
        &self,
        chat_id: &str,
        user_id: &str,
    ) -> Result<Option<ChatRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let chat =
            sqlx::query_as::<_, ChatRecord>("SELECT * FROM chats WHERE id = ? AND user_id = ?")
                .bind(chat_id)
                .bind(user_id)
                .fetch_optional(pool)
                .await?;

        Ok(chat)
    }

    /// Lists the user's chats, most recently updated first.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<ChatRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let chats = sqlx::query_as::<_, ChatRecord>(
            "SELECT * FROM chats WHERE user_id = ? ORDER BY updated_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(chats)
    }

    /// Deletes the chat and its messages when owned by `user_id`.
    ///
    /// Returns `false` if the chat does not exist or belongs to someone else.
    pub async fn delete_owned(&self, chat_id: &str, user_id: &str) -> Result<bool, StorageError> {
        let pool = self.pool_manager.pool();
        let mut tx = pool.begin().await?;

        let result = sqlx::query("DELETE FROM chats WHERE id = ? AND user_id = ?")
            .bind(chat_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("DELETE FROM messages WHERE chat_id = ?")
            .bind(chat_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(chat_id = %chat_id, user_id = %user_id, "Deleted chat");
        Ok(true)
    }

    /// Appends a message to its chat and bumps the chat's `updated_at`.
    pub async fn append_message(&self, message: &MessageRecord) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();
        let mut tx = pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO messages (id, chat_id, role, content, is_image, is_published, timestamp)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&message.id)
        .bind(&message.chat_id)
        .bind(&message.role)
        .bind(&message.content)
        .bind(message.is_image)
        .bind(message.is_published)
        .bind(message.timestamp)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE chats SET updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(&message.chat_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            chat_id = %message.chat_id,
            message_id = %message.id,
            role = %message.role,
            "Appended message"
        );
        Ok(())
    }

    /// Messages of a chat in append order.
    pub async fn messages_for_chat(
        &self,
        chat_id: &str,
    ) -> Result<Vec<MessageRecord>, StorageError> {
        let pool = self.pool_manager.pool();

        let messages = sqlx::query_as::<_, MessageRecord>(
            "SELECT * FROM messages WHERE chat_id = ? ORDER BY timestamp ASC, rowid ASC",
        )
        .bind(chat_id)
        .fetch_all(pool)
        .await?;

        Ok(messages)
    }
}
