//! Message service: the "send message" protocol for text and image modes.
//!
//! Ordering is fixed: validate, append the user prompt, call the provider,
//! append the reply, debit. The prompt append and the provider call are not
//! atomic; a provider failure leaves the prompt in place and debits nothing
//! (kept from the original client contract, see DESIGN.md).

use std::sync::Arc;

use chat_core::{AppError, GenerationMode, Result};
use storage::{ChatRepository, MessageRecord, UserRecord, UserRepository};
use tracing::{info, instrument, warn};

use super::{ImageGenerator, TextGenerator};

#[derive(Clone)]
pub struct MessageService {
    users: UserRepository,
    chats: ChatRepository,
    text: Arc<dyn TextGenerator>,
    image: Arc<dyn ImageGenerator>,
}

impl MessageService {
    pub fn new(
        users: UserRepository,
        chats: ChatRepository,
        text: Arc<dyn TextGenerator>,
        image: Arc<dyn ImageGenerator>,
    ) -> Self {
        Self {
            users,
            chats,
            text,
            image,
        }
    }

    /// Sends one message: appends the user prompt and the generated reply to
    /// the chat, debits the mode's credit cost, and returns the reply.
    ///
    /// Precondition failures (inactive account, foreign chat, short balance)
    /// return before any write.
    #[instrument(skip(self, user, prompt), fields(user_id = %user.id))]
    pub async fn send(
        &self,
        user: &UserRecord,
        chat_id: &str,
        mode: GenerationMode,
        prompt: &str,
        is_published: bool,
    ) -> Result<MessageRecord> {
        if !user.is_active {
            return Err(AppError::AccountNotActive);
        }

        let chat = self
            .chats
            .find_owned(chat_id, &user.id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or(AppError::ChatNotFound)?;

        let cost = mode.cost();
        if user.credits < cost {
            return Err(AppError::InsufficientCredits);
        }

        // The prompt is persisted before the provider call, never batched
        // with the reply.
        let prompt_message = MessageRecord::user(chat.id.clone(), prompt.to_string());
        self.chats
            .append_message(&prompt_message)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let reply = match mode {
            GenerationMode::Text => {
                let content = self
                    .text
                    .complete(prompt)
                    .await
                    .map_err(|e| AppError::Provider(e.to_string()))?;
                MessageRecord::assistant(chat.id.clone(), content, false, false)
            }
            GenerationMode::Image => {
                let url = self
                    .image
                    .generate_hosted(prompt)
                    .await
                    .map_err(|e| AppError::Provider(e.to_string()))?;
                MessageRecord::assistant(chat.id.clone(), url, true, is_published)
            }
        };

        self.chats
            .append_message(&reply)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // Best-effort, sequenced after persistence. A refused debit means a
        // concurrent send spent the balance first; the reply is already
        // persisted, so log it rather than failing the request.
        let debited = self
            .users
            .debit(&user.id, cost, mode.as_str())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        if !debited {
            warn!(
                user_id = %user.id,
                cost,
                mode = mode.as_str(),
                "Reply delivered but debit refused; balance was spent concurrently"
            );
        }

        info!(
            chat_id = %chat.id,
            mode = mode.as_str(),
            cost,
            "Message sent"
        );
        Ok(reply)
    }
}
