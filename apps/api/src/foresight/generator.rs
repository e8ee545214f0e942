//! Foresight generation: orchestrates prompt → backend fallback → extraction.
//!
//! Flow: build_foresight_prompt → primary backend (if configured) →
//!       secondary backend (on skip, error or empty text) → extract_opportunities.
//!
//! At most two outbound calls per request, always sequential. Nothing is retried
//! and nothing is cached; every request produces a fresh `GeneratedReport`.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::foresight::extractor::extract_opportunities;
use crate::foresight::models::GeneratedReport;
use crate::foresight::prompts::{build_foresight_prompt, FORESIGHT_SYSTEM};
use crate::llm_client::{CompletionRequest, LlmError, TextBackend};

const FORESIGHT_TEMPERATURE: f32 = 0.8;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Request body for a foresight scan.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub client_name: String,
    pub project_name: String,
    pub context: String,
}

impl ReportRequest {
    /// All three fields are required and must not be blank.
    pub fn validate(&self) -> Result<(), AppError> {
        let missing: Vec<&str> = [
            ("projectName", &self.project_name),
            ("clientName", &self.client_name),
            ("context", &self.context),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "{} cannot be empty",
                missing.join(", ")
            )))
        }
    }
}

/// Raw text from whichever backend answered.
#[derive(Debug, Clone)]
pub struct GeneratedText {
    pub backend: &'static str,
    pub text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Generator
// ────────────────────────────────────────────────────────────────────────────

/// Tries `primary`, then `secondary`. Which backends are usable is fixed at
/// construction; nothing is read from the environment per call.
#[derive(Clone)]
pub struct ForesightGenerator {
    primary: Arc<dyn TextBackend>,
    secondary: Arc<dyn TextBackend>,
}

impl ForesightGenerator {
    pub fn new(primary: Arc<dyn TextBackend>, secondary: Arc<dyn TextBackend>) -> Self {
        Self { primary, secondary }
    }

    /// Name of the backend that will be tried first.
    pub fn first_choice(&self) -> &'static str {
        if self.primary.is_configured() {
            self.primary.name()
        } else {
            self.secondary.name()
        }
    }

    /// Obtains raw opportunity text. The secondary backend's error is returned
    /// when both fail.
    pub async fn generate_text(
        &self,
        client_name: &str,
        context: &str,
    ) -> Result<GeneratedText, LlmError> {
        let prompt = build_foresight_prompt(client_name, context);

        if self.primary.is_configured() {
            info!("Using {} for report generation", self.primary.name());
            match call(self.primary.as_ref(), &prompt).await {
                Ok(generated) => {
                    info!("{} generation successful", generated.backend);
                    return Ok(generated);
                }
                Err(e) => warn!(
                    "{} failed, falling back to {}: {e}",
                    self.primary.name(),
                    self.secondary.name()
                ),
            }
        } else {
            info!(
                "{} not configured, falling back to {}",
                self.primary.name(),
                self.secondary.name()
            );
        }

        call(self.secondary.as_ref(), &prompt).await
    }

    /// Full pipeline: validate → generate text → extract → wrap.
    ///
    /// An empty extraction is an error (`AppError::NoOpportunities`), never an
    /// empty success.
    pub async fn generate_report(&self, request: ReportRequest) -> Result<GeneratedReport, AppError> {
        request.validate()?;

        info!(
            "Generating foresight scan for client '{}' (project '{}')",
            request.client_name, request.project_name
        );
        let generated = self
            .generate_text(&request.client_name, &request.context)
            .await?;

        let opportunities = extract_opportunities(&generated.text);
        if opportunities.is_empty() {
            warn!(
                "{} returned {} chars but no opportunities could be extracted",
                generated.backend,
                generated.text.len()
            );
            return Err(AppError::NoOpportunities);
        }

        info!(
            "Extracted {} opportunities from {} output",
            opportunities.len(),
            generated.backend
        );

        Ok(GeneratedReport {
            report_id: Uuid::new_v4(),
            client_name: request.client_name,
            project_name: request.project_name,
            context: request.context,
            generated_at: Utc::now(),
            backend: generated.backend.to_string(),
            opportunities,
        })
    }
}

/// One backend call with that backend's own output budget. Blank text counts
/// as a failure.
async fn call(backend: &dyn TextBackend, prompt: &str) -> Result<GeneratedText, LlmError> {
    let request = CompletionRequest {
        system: FORESIGHT_SYSTEM,
        prompt,
        temperature: FORESIGHT_TEMPERATURE,
        max_tokens: backend.default_max_tokens(),
    };

    let text = backend.complete(&request).await?;
    if text.trim().is_empty() {
        return Err(LlmError::EmptyContent);
    }

    Ok(GeneratedText {
        backend: backend.name(),
        text,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
