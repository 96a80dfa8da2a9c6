//! Bearer-token gate shared by every protected route.
//!
//! The header must be exactly `<scheme> <credential>` separated by a single
//! space, the scheme must be `bearer` in any case, and the credential must be
//! a stored token that has not expired. Every failure renders the same 403 so
//! callers cannot tell which check tripped; the log line says which one did.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::authority::mask_token;
use crate::errors::AppError;
use crate::models::token::unix_now;
use crate::AppState;

/// Attached to the request once the bearer token checks out.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub uploader_slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    MissingHeader,
    UnreadableHeader,
    PartCount(usize),
    Scheme,
    UnknownToken,
    Expired,
}

impl AuthFailure {
    fn log(&self) {
        match self {
            AuthFailure::MissingHeader => tracing::warn!("auth: missing Authorization header"),
            AuthFailure::UnreadableHeader => {
                tracing::warn!("auth: Authorization header is not valid ASCII")
            }
            AuthFailure::PartCount(n) => {
                tracing::warn!(parts = n, "auth: Authorization header must have 2 parts")
            }
            AuthFailure::Scheme => tracing::warn!("auth: Authorization scheme is not bearer"),
            AuthFailure::UnknownToken => tracing::warn!("auth: token not found"),
            AuthFailure::Expired => tracing::warn!("auth: token expired"),
        }
    }
}

/// Pull the credential out of `Authorization: Bearer <token>`.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthFailure> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthFailure::MissingHeader)?
        .to_str()
        .map_err(|_| AuthFailure::UnreadableHeader)?;

    let parts: Vec<&str> = value.split(' ').collect();
    if parts.len() != 2 {
        return Err(AuthFailure::PartCount(parts.len()));
    }
    if !parts[0].eq_ignore_ascii_case("bearer") {
        return Err(AuthFailure::Scheme);
    }

    Ok(parts[1])
}

/// Middleware: rejects with 403 unless the bearer token is stored and unexpired.
/// On success the handler can read [`AuthSession`] from the request extensions.
pub async fn require_bearer(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session = authenticate(&state, req.headers()).await.map_err(|failure| {
        failure.log();
        AppError::Forbidden
    })?;

    tracing::debug!(
        token = %mask_token(&session.token),
        uploader = %session.uploader_slug,
        "auth: token accepted"
    );
    req.extensions_mut().insert(session);

    let resp = next.run(req).await;
    tracing::info!("Auth middleware complete.");
    Ok(resp)
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthSession, AuthFailure> {
    let token = extract_bearer(headers)?;

    let record = state
        .sessions
        .get(token)
        .await
        .ok_or(AuthFailure::UnknownToken)?;

    // Expired records stay in the store; they just stop authorizing.
    if record.is_expired_at(unix_now()) {
        return Err(AuthFailure::Expired);
    }

    Ok(AuthSession {
        token: record.token,
        uploader_slug: record.uploader_slug,
    })
}
