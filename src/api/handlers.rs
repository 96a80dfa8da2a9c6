use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::authority::mask_token;
use crate::errors::AppError;
use crate::middleware::auth::AuthSession;
use crate::models::configuration::parse_configuration;
use crate::models::token::TokenRecord;
use crate::AppState;

// ── Response DTOs ────────────────────────────────────────────

#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

#[derive(Serialize)]
pub struct DefaultCheckResponse {
    pub success: bool,
    pub default: bool,
}

// ── Handlers ─────────────────────────────────────────────────

/// GET /uploaders_api/v1/auth/swap/:uploader — exchange an uploader slug for a token.
///
/// The stored token is never echoed: the response is the authority's body
/// without `client_token`.
pub async fn swap_token(
    State(state): State<Arc<AppState>>,
    Path(uploader): Path<String>,
) -> Result<Json<Value>, AppError> {
    let issued = state.authority.create_swap_token(&uploader).await?;

    state
        .sessions
        .put(TokenRecord::new(
            issued.client_token.clone(),
            issued.expires,
            uploader.clone(),
        ))
        .await;

    let body = Value::Object(issued.body);
    tracing::info!(
        uploader = %uploader,
        token = %mask_token(&issued.client_token),
        expires = issued.expires,
        "OK: {}",
        body
    );

    Ok(Json(body))
}

/// GET /uploaders_api/v1/auth/revoke — forget the presented token.
pub async fn revoke_token(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AuthSession>,
) -> Json<SuccessResponse> {
    state.sessions.delete(&session.token).await;
    tracing::info!(uploader = %session.uploader_slug, "Token revoked.");
    SuccessResponse::ok()
}

/// GET /uploaders_api/v1/uploaders/default_check
pub async fn default_check(State(state): State<Arc<AppState>>) -> Json<DefaultCheckResponse> {
    let default = state.sessions.is_default().await;
    tracing::info!("Default check ran. Returned {}.", default);
    Json(DefaultCheckResponse {
        success: true,
        default,
    })
}

/// GET /uploaders_api/v1/uploaders/default_prompt — flip the default flag.
/// The response does not report the new value.
pub async fn default_prompt(State(state): State<Arc<AppState>>) -> Json<SuccessResponse> {
    let now_default = state.sessions.toggle_default().await;
    tracing::info!(default = now_default, "Prompt ran. Uploader toggled as default.");
    SuccessResponse::ok()
}

/// GET /uploaders_api/v1/uploaders/set — validate a configuration and pretend to apply it.
pub async fn set_config(
    Extension(session): Extension<AuthSession>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<SuccessResponse>, AppError> {
    let config = Value::Object(parse_configuration(pairs)?);
    tracing::info!(
        uploader = %session.uploader_slug,
        "This would add {} to your configuration.",
        config
    );
    Ok(SuccessResponse::ok())
}
