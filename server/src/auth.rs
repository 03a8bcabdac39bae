//! Auth gate: HMAC-SHA256 JWTs carrying the user id as subject, and the axum
//! middleware that resolves the `Authorization` header to a [`UserRecord`].
//!
//! The header carries the raw token with no `Bearer ` prefix; that is the
//! contract the existing clients follow.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, TimeZone, Utc};
use hmac::{Hmac, Mac};
use jwt::{Claims, Header, RegisteredClaims, SignWithKey, Token, VerifyWithKey};
use sha2::Sha256;

use crate::error::ApiError;
use crate::state::AppState;

/// Signs a token for the given user id, valid until `expiration`.
pub fn sign_token(secret: &str, user_id: &str, expiration: DateTime<Utc>) -> Option<String> {
    let key = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).ok()?;
    let claims = Claims::new(RegisteredClaims {
        issuer: None,
        subject: Some(user_id.to_string()),
        audience: None,
        expiration: Some(expiration.timestamp() as u64),
        not_before: None,
        issued_at: Some(Utc::now().timestamp() as u64),
        json_web_token_id: None,
    });

    claims.sign_with_key(&key).ok()
}

/// Verifies a token and extracts the user id from the subject claim.
///
/// Returns `None` on any failure: bad signature, malformed claims, expired,
/// or issued in the future.
pub fn verify_token(secret: &str, token: &str) -> Option<String> {
    let key = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).ok()?;
    let token: Token<Header, Claims, _> = token.verify_with_key(&key).ok()?;

    let claims = token.claims();

    let iat = Utc
        .timestamp_opt(claims.registered.issued_at? as i64, 0)
        .single()?;
    if iat > Utc::now() {
        return None;
    }

    let exp = claims
        .registered
        .expiration
        .and_then(|x| Utc.timestamp_opt(x as i64, 0).single());
    if let Some(exp) = exp {
        if exp < Utc::now() {
            return None;
        }
    }

    claims.registered.subject.clone()
}

/// Middleware guarding the chat/message/credit routes.
///
/// Resolves the raw `Authorization` token to a user and stashes the record in
/// request extensions. The three failure cases stay distinct: missing header,
/// failed verification, and a subject whose user row is gone.
pub async fn require_user(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::NoToken)?;

    let user_id =
        verify_token(&state.config.jwt_secret, token).ok_or(ApiError::TokenFailed)?;

    let user = state
        .users
        .find_by_id(&user_id)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?
        .ok_or(ApiError::UserNotFound)?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
