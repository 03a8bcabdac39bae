//! Message endpoints: text and image sends.
//!
//! Validation and provider failures come back as HTTP 200 with
//! `{success: false, message}`; only the auth gate produces error statuses.

use axum::{extract::State, Extension, Json};
use chat_core::GenerationMode;
use serde::Deserialize;
use serde_json::{json, Value};
use storage::{MessageRecord, UserRecord};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub chat_id: String,
    pub prompt: String,
    #[serde(default)]
    pub is_published: bool,
}

fn respond(result: chat_core::Result<MessageRecord>) -> Json<Value> {
    match result {
        Ok(reply) => Json(json!({"success": true, "reply": reply})),
        Err(e) => Json(json!({"success": false, "message": e.to_string()})),
    }
}

pub async fn text(
    State(state): State<AppState>,
    Extension(user): Extension<UserRecord>,
    Json(req): Json<SendMessageRequest>,
) -> Json<Value> {
    respond(
        state
            .messages
            .send(&user, &req.chat_id, GenerationMode::Text, &req.prompt, false)
            .await,
    )
}

pub async fn image(
    State(state): State<AppState>,
    Extension(user): Extension<UserRecord>,
    Json(req): Json<SendMessageRequest>,
) -> Json<Value> {
    respond(
        state
            .messages
            .send(
                &user,
                &req.chat_id,
                GenerationMode::Image,
                &req.prompt,
                req.is_published,
            )
            .await,
    )
}
