//! HTTP client for the external token authority.
//!
//! One outbound call per issuance, no retries. The client carries a request
//! timeout so a hung authority surfaces as a 502 instead of a stuck request.

use std::time::Duration;

use anyhow::Context;
use serde_json::{Map, Value};

use crate::errors::AppError;

/// A token minted by the authority.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub client_token: String,
    pub expires: i64,
    /// The authority's response body with `client_token` removed.
    pub body: Map<String, Value>,
}

#[derive(Clone)]
pub struct AuthorityClient {
    client: reqwest::Client,
    base_url: String,
}

impl AuthorityClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .context("failed to build token authority HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn create_url(&self, uploader_slug: &str) -> String {
        format!(
            "{}/swap_tokens/create/{}",
            self.base_url,
            urlencoding::encode(uploader_slug)
        )
    }

    /// Ask the authority to mint a swap token for `uploader_slug`.
    ///
    /// A non-success answer comes back as [`AppError::Upstream`] carrying the
    /// authority's status and body; a non-JSON body is wrapped as a JSON string.
    /// A success answer that is not JSON counts as the authority being unavailable.
    pub async fn create_swap_token(&self, uploader_slug: &str) -> Result<IssuedToken, AppError> {
        let url = self.create_url(uploader_slug);

        let resp = self.client.get(&url).send().await.map_err(|e| {
            tracing::warn!(uploader = uploader_slug, "token authority request failed: {}", e);
            AppError::AuthorityUnavailable(e.to_string())
        })?;

        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| AppError::AuthorityUnavailable(e.to_string()))?;

        if !status.is_success() {
            let body = serde_json::from_slice::<Value>(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
            tracing::warn!(uploader = uploader_slug, %status, "FAIL: {}", body);
            return Err(AppError::Upstream { status, body });
        }

        let body: Value = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::warn!(uploader = uploader_slug, "token authority sent a non-JSON body: {}", e);
            AppError::AuthorityUnavailable(format!("body is not JSON: {}", e))
        })?;

        parse_issued(body)
    }
}

/// Split a successful authority body into the token and the public metadata.
fn parse_issued(body: Value) -> Result<IssuedToken, AppError> {
    let mut body = match body {
        Value::Object(map) => map,
        other => {
            return Err(AppError::AuthorityResponse(format!(
                "expected a JSON object, got {}",
                other
            )))
        }
    };

    let client_token = match body.remove("client_token") {
        Some(Value::String(token)) if !token.is_empty() => token,
        _ => {
            return Err(AppError::AuthorityResponse(
                "missing or empty client_token".into(),
            ))
        }
    };

    let expires = body
        .get("expires")
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
        .ok_or_else(|| AppError::AuthorityResponse("missing or non-numeric expires".into()))?;

    Ok(IssuedToken {
        client_token,
        expires,
        body,
    })
}

/// Shorten a token for log lines.
pub fn mask_token(token: &str) -> String {
    if token.len() > 8 && token.is_ascii() {
        format!("{}…{}", &token[..4], &token[token.len() - 4..])
    } else {
        "****".to_string()
    }
}
