//! Primary backend: Groq's OpenAI-compatible chat completions endpoint.

use async_trait::async_trait;
use reqwest::Client;

use super::{send_chat, ChatCompletionRequest, CompletionRequest, LlmError, TextBackend};

pub const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
/// Fast, capable model on the free tier. Hardcoded to prevent drift.
pub const GROQ_MODEL: &str = "llama-3.3-70b-versatile";
const GROQ_MAX_TOKENS: u32 = 8000;

#[derive(Clone)]
pub struct GroqBackend {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
}

impl GroqBackend {
    /// A blank or missing key leaves the backend unconfigured.
    pub fn new(client: Client, api_key: Option<String>, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            endpoint: endpoint.into(),
        }
    }

    fn body<'a>(&self, request: &CompletionRequest<'a>) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: GROQ_MODEL,
            messages: request.messages(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            top_p: Some(1.0),
            stream: false,
        }
    }
}

#[async_trait]
impl TextBackend for GroqBackend {
    fn name(&self) -> &'static str {
        "groq"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn default_max_tokens(&self) -> u32 {
        GROQ_MAX_TOKENS
    }

    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, LlmError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(LlmError::NotConfigured(self.name()))?;

        let builder = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&self.body(request));

        send_chat(builder, self.name()).await
    }
}
