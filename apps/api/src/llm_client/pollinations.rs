//! Secondary backend: pollinations.ai, reached through our own proxy route
//! (`POST /api/generate-report`, see `routes::proxy`).

use async_trait::async_trait;
use reqwest::Client;

use super::{send_chat, ChatCompletionRequest, CompletionRequest, LlmError, TextBackend};

pub const POLLINATIONS_MODEL: &str = "openai";
const POLLINATIONS_MAX_TOKENS: u32 = 4000;

#[derive(Clone)]
pub struct PollinationsBackend {
    client: Client,
    proxy_url: String,
}

impl PollinationsBackend {
    pub fn new(client: Client, proxy_url: impl Into<String>) -> Self {
        Self {
            client,
            proxy_url: proxy_url.into(),
        }
    }
}

#[async_trait]
impl TextBackend for PollinationsBackend {
    fn name(&self) -> &'static str {
        "pollinations"
    }

    fn default_max_tokens(&self) -> u32 {
        POLLINATIONS_MAX_TOKENS
    }

    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, LlmError> {
        let body = ChatCompletionRequest {
            model: POLLINATIONS_MODEL,
            messages: request.messages(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            top_p: None,
            stream: false,
        };

        send_chat(self.client.post(&self.proxy_url).json(&body), self.name()).await
    }
}
