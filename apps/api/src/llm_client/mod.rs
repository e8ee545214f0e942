/// LLM Client: the single point of entry for all text-generation calls.
///
/// ARCHITECTURAL RULE: No other module may call a text-generation endpoint directly.
/// Backends live here behind `TextBackend`; fallback ordering lives in
/// `foresight::generator`.
///
/// Both backends speak the OpenAI chat-completions shape and return
/// `choices[0].message.content`.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod groq;
pub mod pollinations;

pub use groq::GroqBackend;
pub use pollinations::PollinationsBackend;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("{0} backend is not configured")]
    NotConfigured(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate limit exceeded. Please wait a moment and try again.")]
    RateLimited,

    #[error("The AI service is currently overloaded or experiencing issues. Please try again in a few moments. (Error: {0})")]
    Overloaded(String),

    #[error("AI API Error: {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No response generated from AI")]
    EmptyContent,
}

impl LlmError {
    /// Classifies a non-2xx backend response. Only 429 and 500 get their own
    /// variants; every other status, 502/503/504 included, is a plain `Api` error.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = error_message(body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

        if status == StatusCode::TOO_MANY_REQUESTS {
            LlmError::RateLimited
        } else if status == StatusCode::INTERNAL_SERVER_ERROR {
            LlmError::Overloaded(message)
        } else {
            LlmError::Api {
                status: status.as_u16(),
                message,
            }
        }
    }
}

/// Pulls a human-readable message out of an error body.
///
/// Understands the proxy shape `{error: "...", details: "..."}` and the
/// OpenAI shape `{error: {message: "..."}}`. Falls back to the raw body.
fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return Some(body.to_string());
    };

    let from_error = match value.get("error") {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Object(obj)) => obj
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    };

    from_error
        .or_else(|| {
            value
                .get("details")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
        .or_else(|| Some(body.to_string()))
}

// ────────────────────────────────────────────────────────────────────────────
// Backend trait
// ────────────────────────────────────────────────────────────────────────────

/// One generation call: a system instruction, a single user instruction,
/// a temperature and an output budget.
#[derive(Debug, Clone)]
pub struct CompletionRequest<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl<'a> CompletionRequest<'a> {
    fn messages(&self) -> Vec<ChatMessage<'a>> {
        let mut messages = Vec::with_capacity(2);
        if !self.system.is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: self.system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: self.prompt,
        });
        messages
    }
}

/// A text-generation service. Implementations are interchangeable; the
/// generator decides the order they are tried in.
#[async_trait]
pub trait TextBackend: Send + Sync {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// False when a required credential is missing. Decided at construction.
    fn is_configured(&self) -> bool {
        true
    }

    /// Output budget used when the caller has no preference.
    fn default_max_tokens(&self) -> u32;

    /// Returns the generated text.
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    pub usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatCompletionResponse {
    /// Content of the first choice, if it has any non-whitespace text.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|text| !text.trim().is_empty())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Shared plumbing
// ────────────────────────────────────────────────────────────────────────────

/// Builds the HTTP client shared by every backend and the proxy.
pub fn build_http_client(timeout: Duration) -> Result<Client, LlmError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Sends a prepared chat-completions request and returns the generated text.
async fn send_chat(request: RequestBuilder, backend: &'static str) -> Result<String, LlmError> {
    let response = request
        .header("content-type", "application/json")
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        warn!("{backend} returned {status}: {body}");
        return Err(LlmError::from_status(status, &body));
    }

    let parsed: ChatCompletionResponse = serde_json::from_str(&body)?;

    if let Some(usage) = &parsed.usage {
        debug!(
            "{backend} call succeeded: prompt_tokens={}, completion_tokens={}",
            usage.prompt_tokens, usage.completion_tokens
        );
    }

    parsed
        .text()
        .map(str::to_string)
        .ok_or(LlmError::EmptyContent)
}
