//! Message model: append-only rows within a chat, immutable once inserted.
//!
//! `content` is plain text, or the hosted image URL when `is_image` is set.

use chat_core::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    pub id: String,
    pub chat_id: String,
    /// `"user"` or `"assistant"`.
    pub role: String,
    pub content: String,
    pub is_image: bool,
    /// Image messages only: whether the image is shared to the community feed.
    pub is_published: bool,
    pub timestamp: DateTime<Utc>,
}

impl MessageRecord {
    /// A user prompt message (never an image).
    pub fn user(chat_id: String, content: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            chat_id,
            role: Role::User.as_str().to_string(),
            content,
            is_image: false,
            is_published: false,
            timestamp: Utc::now(),
        }
    }

    /// An assistant reply, text or hosted image URL.
    pub fn assistant(chat_id: String, content: String, is_image: bool, is_published: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            chat_id,
            role: Role::Assistant.as_str().to_string(),
            content,
            is_image,
            is_published,
            timestamp: Utc::now(),
        }
    }
}
