//! Chat endpoints: create, list, delete (whole-chat).

use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use storage::{ChatRecord, UserRecord};
use tracing::error;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteChatRequest {
    pub chat_id: String,
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<UserRecord>,
) -> Json<Value> {
    let chat = ChatRecord::new(user.id.clone(), "New Chat".to_string());

    match state.chats.save(&chat).await {
        Ok(()) => Json(json!({"success": true, "chat": chat})),
        Err(e) => {
            error!(error = %e, user_id = %user.id, "Failed to create chat");
            Json(json!({"success": false, "message": e.to_string()}))
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<UserRecord>,
) -> Json<Value> {
    match state.chats.list_for_user(&user.id).await {
        Ok(chats) => Json(json!({"success": true, "chats": chats})),
        Err(e) => {
            error!(error = %e, user_id = %user.id, "Failed to list chats");
            Json(json!({"success": false, "message": e.to_string()}))
        }
    }
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<UserRecord>,
    Json(req): Json<DeleteChatRequest>,
) -> Json<Value> {
    match state.chats.delete_owned(&req.chat_id, &user.id).await {
        Ok(true) => Json(json!({"success": true, "message": "Chat deleted"})),
        Ok(false) => Json(json!({"success": false, "message": "Chat not found"})),
        Err(e) => {
            error!(error = %e, chat_id = %req.chat_id, "Failed to delete chat");
            Json(json!({"success": false, "message": e.to_string()}))
        }
    }
}
