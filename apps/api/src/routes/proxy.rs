//! Pass-through proxy to pollinations.ai at `POST /api/generate-report`.
//!
//! The secondary backend talks to this route rather than the upstream directly.
//! Successful upstream bodies are returned verbatim; failures come back as
//! `{error, details?, status?}` with the upstream status code preserved.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use tracing::{error, info};

use crate::llm_client::pollinations::POLLINATIONS_MODEL;
use crate::state::AppState;

const DEFAULT_TEMPERATURE: f64 = 0.7;
const DEFAULT_MAX_TOKENS: u64 = 3000;
/// Upper bound on `max_tokens`, protecting the upstream from oversized requests.
const MAX_TOKENS_CAP: u64 = 4000;

/// Error body returned by the proxy route.
#[derive(Debug)]
pub struct ProxyError {
    status: StatusCode,
    error: String,
    details: Option<String>,
    upstream_status: Option<u16>,
}

impl ProxyError {
    fn bad_request(message: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: message.to_string(),
            details: None,
            upstream_status: None,
        }
    }

    fn rejected(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            error: "Invalid request body".to_string(),
            details: Some(rejection.body_text()),
            upstream_status: None,
        }
    }

    fn internal(error: &str, details: String) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: error.to_string(),
            details: Some(details),
            upstream_status: None,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let mut body = Map::new();
        body.insert("error".to_string(), Value::String(self.error));
        if let Some(details) = self.details {
            body.insert("details".to_string(), Value::String(details));
        }
        if let Some(status) = self.upstream_status {
            body.insert("status".to_string(), json!(status));
        }
        (self.status, Json(Value::Object(body))).into_response()
    }
}

/// `min(max_tokens || 3000, 4000)`.
pub fn clamp_max_tokens(requested: Option<u64>) -> u64 {
    requested
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_MAX_TOKENS)
        .min(MAX_TOKENS_CAP)
}

/// Builds the upstream request body, filling defaults for anything missing.
fn upstream_body(request: &Value) -> Result<Value, ProxyError> {
    let messages = request
        .get("messages")
        .filter(|m| m.is_array())
        .ok_or_else(|| ProxyError::bad_request("Messages array is required"))?;

    let model = request
        .get("model")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .unwrap_or(POLLINATIONS_MODEL);
    let temperature = request
        .get("temperature")
        .and_then(Value::as_f64)
        .filter(|t| *t != 0.0)
        .unwrap_or(DEFAULT_TEMPERATURE);
    let max_tokens = clamp_max_tokens(request.get("max_tokens").and_then(Value::as_u64));

    Ok(json!({
        "model": model,
        "messages": messages,
        "temperature": temperature,
        "max_tokens": max_tokens,
        "stream": false,
    }))
}

/// Any method other than POST on the proxy path.
pub async fn method_not_allowed() -> ProxyError {
    ProxyError {
        status: StatusCode::METHOD_NOT_ALLOWED,
        error: "Method not allowed".to_string(),
        details: None,
        upstream_status: None,
    }
}

/// POST /api/generate-report
pub async fn handle_generate_report_proxy(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ProxyError> {
    let Json(request) = payload.map_err(ProxyError::rejected)?;
    let body = upstream_body(&request)?;

    info!(
        "Forwarding to Pollinations: model={}, messages={}, temperature={}, max_tokens={}",
        body["model"],
        body["messages"].as_array().map(Vec::len).unwrap_or_default(),
        body["temperature"],
        body["max_tokens"]
    );

    let response = state
        .http
        .post(&state.config.pollinations_upstream_url)
        .json(&body)
        .send()
        .await
        .map_err(|e| {
            error!("Proxy error: {e}");
            ProxyError::internal("Internal server error", e.to_string())
        })?;

    let upstream = response.status().as_u16();
    let reason = response
        .status()
        .canonical_reason()
        .unwrap_or("unknown error")
        .to_string();
    let text = response.text().await.map_err(|e| {
        error!("Proxy error reading upstream body: {e}");
        ProxyError::internal("Internal server error", e.to_string())
    })?;

    info!("Pollinations API response status: {upstream}");

    if !(200..300).contains(&upstream) {
        error!("Pollinations API error: {upstream} {text}");
        return Err(ProxyError {
            status: StatusCode::from_u16(upstream).unwrap_or(StatusCode::BAD_GATEWAY),
            error: format!("Pollinations API error: {reason}"),
            details: Some(text),
            upstream_status: Some(upstream),
        });
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(data) => Ok(Json(data).into_response()),
        Err(e) => {
            error!("Error parsing upstream response: {e}");
            Err(ProxyError::internal("Failed to parse API response", text))
        }
    }
}
