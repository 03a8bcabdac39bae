//! User endpoint: current user and credit balance, as resolved by the auth gate.

use axum::{Extension, Json};
use serde_json::{json, Value};
use storage::UserRecord;

pub async fn data(Extension(user): Extension<UserRecord>) -> Json<Value> {
    Json(json!({"success": true, "user": user}))
}
