//! Router assembly: the public webhook plus the auth-gated API routes.

mod chat;
mod credit;
mod message;
mod user;
mod webhook;

use axum::{
    http,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::auth;
use crate::state::AppState;

async fn root() -> &'static str {
    "server is live!"
}

/// Builds the application router.
///
/// `/api/stripe` stays outside the auth gate: its only authentication is the
/// webhook signature, and it must see the raw body.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/user/data", get(user::data))
        .route("/api/chat/create", post(chat::create))
        .route("/api/chat/get", get(chat::list))
        .route("/api/chat/delete", post(chat::delete))
        .route("/api/message/text", post(message::text))
        .route("/api/message/image", post(message::image))
        .route("/api/credit/plans", get(credit::plans))
        .route("/api/credit/purchase", post(credit::purchase))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_user,
        ));

    Router::new()
        .route("/", get(root))
        .route("/api/stripe", post(webhook::stripe_webhook))
        .merge(protected)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([http::Method::GET, http::Method::POST])
                .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION]),
        )
        .with_state(state)
}
