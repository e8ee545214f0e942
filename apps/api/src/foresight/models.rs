use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Score assigned when the SCORING section is missing or a label has no number.
pub const DEFAULT_SCORE: u32 = 5;

/// The three 1–10 scores the model attaches to each opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scoring {
    pub tam: u32,
    pub switch_cost: u32,
    pub moat: u32,
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            tam: DEFAULT_SCORE,
            switch_cost: DEFAULT_SCORE,
            moat: DEFAULT_SCORE,
        }
    }
}

/// One opportunity parsed out of a generation response.
///
/// Missing sections are empty strings or empty lists, never absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityRecord {
    pub title: String,
    pub explanation: String,
    pub evidence_quotes: Vec<String>,
    pub segment_sizing: String,
    pub trigger_events: Vec<String>,
    pub early_indicators: Vec<String>,
    pub strategic_relevance: String,
    pub market_mapping: String,
    pub underserved_segment_strategy: String,
    pub scoring: Scoring,
    pub scenario_modeling: String,
    pub regulatory_context: String,
}

/// Result of one generation request. Built fresh per request and never stored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedReport {
    pub report_id: Uuid,
    pub client_name: String,
    pub project_name: String,
    pub context: String,
    pub generated_at: DateTime<Utc>,
    /// Name of the backend whose text was parsed.
    pub backend: String,
    pub opportunities: Vec<OpportunityRecord>,
}
