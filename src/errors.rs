use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;

pub const FORBIDDEN_MESSAGE: &str = "Forbidden.";
pub const CONFIG_PARSE_MESSAGE: &str = "Failed to JSON parse a part of your configuration.";

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing, malformed, unknown or expired bearer credential.
    /// Callers never learn which check failed.
    #[error("forbidden")]
    Forbidden,

    #[error("configuration value for '{key}' is not valid JSON")]
    ConfigParse { key: String },

    /// The token authority answered with a non-success status.
    /// Rendered with the same status and body. A JSON body passes through
    /// unchanged; any other body arrives here as a JSON string of its text,
    /// so it is re-encoded rather than byte-for-byte.
    #[error("token authority returned {status}")]
    Upstream { status: StatusCode, body: Value },

    /// The token authority answered 2xx but the body is unusable.
    #[error("invalid token authority response: {0}")]
    AuthorityResponse(String),

    #[error("token authority unreachable: {0}")]
    AuthorityUnavailable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            AppError::Forbidden => (StatusCode::FORBIDDEN, FORBIDDEN_MESSAGE),
            AppError::ConfigParse { .. } => (StatusCode::BAD_REQUEST, CONFIG_PARSE_MESSAGE),
            AppError::Upstream { status, body } => {
                return (status, Json(body)).into_response();
            }
            AppError::AuthorityResponse(e) => {
                tracing::error!("token authority response rejected: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "Invalid response from token authority.",
                )
            }
            AppError::AuthorityUnavailable(e) => {
                tracing::error!("token authority unavailable: {}", e);
                (StatusCode::BAD_GATEWAY, "Token authority unavailable.")
            }
        };

        let body = Json(json!({
            "success": false,
            "message": msg,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_forbidden_body() {
        let (status, body) = render(AppError::Forbidden).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({"success": false, "message": "Forbidden."}));
    }

    #[tokio::test]
    async fn test_config_parse_body_does_not_leak_key() {
        let (status, body) = render(AppError::ConfigParse { key: "b".into() }).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({
                "success": false,
                "message": "Failed to JSON parse a part of your configuration.",
            })
        );
    }

    #[tokio::test]
    async fn test_upstream_is_verbatim() {
        let upstream = json!({"error": "uploader not found", "code": 42});
        let (status, body) = render(AppError::Upstream {
            status: StatusCode::NOT_FOUND,
            body: upstream.clone(),
        })
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, upstream);
    }

    #[tokio::test]
    async fn test_authority_unavailable_is_bad_gateway() {
        let (status, body) =
            render(AppError::AuthorityUnavailable("connection refused".into())).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["success"], false);
    }
}
