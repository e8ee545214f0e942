use anyhow::{Context, Result};

use crate::llm_client::groq::GROQ_API_URL;

const POLLINATIONS_UPSTREAM_URL: &str = "https://text.pollinations.ai/openai";

/// Application configuration loaded from environment variables.
/// Every variable has a default; only malformed numbers abort startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Primary backend credential. `None` leaves the primary backend unconfigured.
    pub groq_api_key: Option<String>,
    pub groq_api_url: String,
    /// Where the secondary backend sends requests. Defaults to our own proxy route.
    pub pollinations_proxy_url: String,
    /// Where the proxy route forwards to.
    pub pollinations_upstream_url: String,
    pub request_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = get("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let request_timeout_secs = get("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| "120".to_string())
            .parse::<u64>()
            .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?;

        Ok(Config {
            groq_api_key: get("GROQ_API_KEY"),
            groq_api_url: get("GROQ_API_URL").unwrap_or_else(|| GROQ_API_URL.to_string()),
            pollinations_proxy_url: get("POLLINATIONS_PROXY_URL")
                .unwrap_or_else(|| format!("http://127.0.0.1:{port}/api/generate-report")),
            pollinations_upstream_url: get("POLLINATIONS_UPSTREAM_URL")
                .unwrap_or_else(|| POLLINATIONS_UPSTREAM_URL.to_string()),
            request_timeout_secs,
            port,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
