use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::Client;

use crate::config::Config;
use crate::foresight::generator::ForesightGenerator;
use crate::llm_client::{build_http_client, GroqBackend, PollinationsBackend};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<ForesightGenerator>,
    /// HTTP client used by the pass-through proxy route.
    pub http: Client,
    pub config: Config,
}

impl AppState {
    /// Wires both backends from config. Primary availability is decided here,
    /// once, from the presence of `GROQ_API_KEY`.
    pub fn from_config(config: Config) -> Result<Self> {
        let http = build_http_client(Duration::from_secs(config.request_timeout_secs))?;

        let primary = GroqBackend::new(
            http.clone(),
            config.groq_api_key.clone(),
            config.groq_api_url.clone(),
        );
        let secondary = PollinationsBackend::new(http.clone(), config.pollinations_proxy_url.clone());

        Ok(Self {
            generator: Arc::new(ForesightGenerator::new(Arc::new(primary), Arc::new(secondary))),
            http,
            config,
        })
    }
}
