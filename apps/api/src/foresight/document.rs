//! Report document: renders a scan as a Markdown file for download.
//!
//! Layout mirrors the numbered sections of the prompt. Empty free-text and list
//! sections are left out; SCORING is always written.

use std::fmt::Write;

use chrono::NaiveDate;

use crate::foresight::extractor::Section;
use crate::foresight::models::OpportunityRecord;

const REPORT_TITLE: &str = "Strategic Foresight Scan";

/// Download name, e.g. `Acme_Strategic_Foresight_Scan_2025-01-31.md`.
pub fn report_file_name(client_name: &str, generated_on: NaiveDate) -> String {
    let client: String = client_name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!(
        "{client}_{}_{}.md",
        REPORT_TITLE.replace(' ', "_"),
        generated_on.format("%Y-%m-%d")
    )
}

pub fn render_report_markdown(
    client_name: &str,
    project_name: &str,
    context: &str,
    generated_on: NaiveDate,
    opportunities: &[OpportunityRecord],
) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "# {REPORT_TITLE}\n");
    let _ = writeln!(out, "## {client_name}\n");
    let _ = writeln!(out, "**Project:** {project_name}  ");
    let _ = writeln!(out, "**Context:** {context}  ");
    let _ = writeln!(out, "**Generated:** {}\n", generated_on.format("%Y-%m-%d"));

    for (index, opp) in opportunities.iter().enumerate() {
        let _ = writeln!(out, "---\n");
        let _ = writeln!(out, "## Opportunity {}: {}\n", index + 1, opp.title);

        write_text(&mut out, Section::DetailedExplanation, &opp.explanation);
        write_list(&mut out, Section::EvidenceQuotes, "EVIDENCE QUOTES AND CITATIONS", &opp.evidence_quotes);
        write_text(&mut out, Section::SegmentSizing, &opp.segment_sizing);
        write_list(&mut out, Section::TriggerEvents, Section::TriggerEvents.header(), &opp.trigger_events);
        write_list(&mut out, Section::EarlyIndicators, Section::EarlyIndicators.header(), &opp.early_indicators);
        write_text(&mut out, Section::StrategicRelevance, &opp.strategic_relevance);
        write_text(&mut out, Section::MarketMapping, &opp.market_mapping);
        write_text(
            &mut out,
            Section::UnderservedSegmentStrategy,
            &opp.underserved_segment_strategy,
        );

        let _ = writeln!(out, "### {}. {}\n", Section::Scoring.number(), Section::Scoring.header());
        let _ = writeln!(out, "- TAM (Total Addressable Market): {}/10", opp.scoring.tam);
        let _ = writeln!(out, "- Switch Cost: {}/10", opp.scoring.switch_cost);
        let _ = writeln!(out, "- Moat Potential: {}/10\n", opp.scoring.moat);

        write_text(&mut out, Section::ScenarioModeling, &opp.scenario_modeling);
        write_text(&mut out, Section::RegulatoryContext, &opp.regulatory_context);
    }

    out
}

fn write_text(out: &mut String, section: Section, text: &str) {
    if text.is_empty() {
        return;
    }
    let _ = writeln!(out, "### {}. {}\n", section.number(), section.header());
    let _ = writeln!(out, "{text}\n");
}

fn write_list(out: &mut String, section: Section, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "### {}. {heading}\n", section.number());
    for item in items {
        let _ = writeln!(out, "- {item}");
    }
    out.push('\n');
}
