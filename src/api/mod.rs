use std::sync::Arc;

use axum::{
    http::{HeaderValue, StatusCode},
    middleware,
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::auth::require_bearer;
use crate::AppState;

pub mod handlers;

/// Prefix every uploader API route is mounted under.
pub const API_PREFIX: &str = "/uploaders_api/v1";

/// Build the uploaders API router.
/// All routes are relative — the caller mounts this under [`API_PREFIX`].
pub fn api_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let protected = Router::new()
        .route("/auth/revoke", get(handlers::revoke_token))
        .route("/uploaders/default_check", get(handlers::default_check))
        .route("/uploaders/default_prompt", get(handlers::default_prompt))
        .route("/uploaders/set", get(handlers::set_config))
        // route_layer: unknown paths fall through to 404, not 403
        .route_layer(middleware::from_fn_with_state(state, require_bearer));

    Router::new()
        .route("/auth/swap/:uploader", get(handlers::swap_token))
        .merge(protected)
}

/// The full application: health check, API routes, CORS, tracing, request ids.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .nest(API_PREFIX, api_router(state.clone()))
        .fallback(fallback_404)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(request_id_middleware))
}

async fn fallback_404() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Middleware: injects a unique X-Request-Id into every response.
async fn request_id_middleware(
    req: axum::extract::Request,
    next: middleware::Next,
) -> axum::response::Response {
    let req_id = uuid::Uuid::new_v4().to_string();
    let mut resp = next.run(req).await;
    if let Ok(val) = HeaderValue::from_str(&req_id) {
        resp.headers_mut().insert("x-request-id", val);
    }
    resp
}
