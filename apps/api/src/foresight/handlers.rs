//! Axum route handlers for the Foresight API.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::foresight::document::{render_report_markdown, report_file_name};
use crate::foresight::extractor::extract_opportunities;
use crate::foresight::generator::ReportRequest;
use crate::foresight::models::{GeneratedReport, OpportunityRecord};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub opportunities: Vec<OpportunityRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequest {
    pub client_name: String,
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub context: String,
    pub opportunities: Vec<OpportunityRecord>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/reports
///
/// Runs the full scan: prompt → backend fallback → extraction.
pub async fn handle_generate_report(
    State(state): State<AppState>,
    Json(request): Json<ReportRequest>,
) -> Result<Json<GeneratedReport>, AppError> {
    let report = state.generator.generate_report(request).await?;
    Ok(Json(report))
}

/// POST /api/v1/opportunities/extract
///
/// Parses already-generated text without calling any backend.
pub async fn handle_extract(
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    let opportunities = extract_opportunities(&request.text);
    if opportunities.is_empty() {
        return Err(AppError::NoOpportunities);
    }
    Ok(Json(ExtractResponse { opportunities }))
}

/// POST /api/v1/reports/document
///
/// Renders records into a Markdown attachment.
pub async fn handle_report_document(
    Json(request): Json<DocumentRequest>,
) -> Result<Response, AppError> {
    if request.client_name.trim().is_empty() {
        return Err(AppError::Validation("clientName cannot be empty".to_string()));
    }
    if request.opportunities.is_empty() {
        return Err(AppError::Validation(
            "opportunities cannot be empty".to_string(),
        ));
    }

    let today = Utc::now().date_naive();
    let body = render_report_markdown(
        &request.client_name,
        &request.project_name,
        &request.context,
        today,
        &request.opportunities,
    );
    let disposition = format!(
        "attachment; filename=\"{}\"",
        report_file_name(&request.client_name, today)
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
