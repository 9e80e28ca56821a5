//! Bearer-token guard for protected routes.
//!
//! Each request is judged on its own: the `Authorization` header either yields a
//! verified user id (stored as an [`AuthUser`] extension for the handler) or the
//! request is rejected with 401 before reaching the handler.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use uuid::Uuid;

use crate::api::problem::unauthorized;

pub const NO_TOKEN: &str = "Not authorized, no token";
pub const TOKEN_FAILED: &str = "Not authorized, token failed";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),
}

/// Port implemented by whoever issues tokens (the users module).
pub trait TokenVerifier: Send + Sync {
    /// Check signature and expiry, returning the user id the token was issued for.
    fn verify(&self, token: &str) -> Result<Uuid, TokenError>;
}

/// Identity of the caller, available to handlers behind [`require_bearer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

/// Extract the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Middleware for `axum::middleware::from_fn_with_state`.
pub async fn require_bearer(
    State(verifier): State<Arc<dyn TokenVerifier>>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(req.headers()) else {
        tracing::debug!(path = %req.uri().path(), "request without bearer token");
        return unauthorized(NO_TOKEN).into_response();
    };

    match verifier.verify(token) {
        Ok(user_id) => {
            req.extensions_mut().insert(AuthUser(user_id));
            next.run(req).await
        }
        Err(e) => {
            tracing::warn!(error = %e, path = %req.uri().path(), "bearer token rejected");
            unauthorized(TOKEN_FAILED).into_response()
        }
    }
}
