//! API error type for the auth gate and webhook endpoint.
//!
//! Business failures on chat/message routes are not errors at the HTTP level;
//! they surface as `{success: false, message}` with status 200, matching the
//! client contract. ApiError covers the cases that do carry a status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// No Authorization header at all.
    #[error("No token provided")]
    NoToken,

    /// Token present but invalid or expired.
    #[error("Not authorized, token failed")]
    TokenFailed,

    /// Token valid but the user row no longer exists.
    #[error("Not authorized, user not found")]
    UserNotFound,

    #[error("Internal server error")]
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NoToken => (
                StatusCode::FORBIDDEN,
                Json(json!({"message": "No token provided"})),
            )
                .into_response(),
            ApiError::TokenFailed => (
                StatusCode::UNAUTHORIZED,
                Json(json!({"message": "Not authorized, token failed"})),
            )
                .into_response(),
            ApiError::UserNotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({"success": false, "message": "Not authorized, user not found"})),
            )
                .into_response(),
            ApiError::Internal(e) => {
                tracing::error!(error = %e, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
