//! Opportunity Extractor: turns the model's free-text report into `OpportunityRecord`s.
//!
//! The model is asked for ten `OPPORTUNITY N:` blocks, each with eleven numbered
//! sections. Output is only loosely followed, so extraction is lenient: a missing
//! section degrades to an empty string, an empty list or a default score, and the
//! extractor itself never fails. An empty result is the caller's problem to report.
//!
//! Section headers come from a static table (`Section::ALL`). Within a block the
//! content of a section is every line after its header up to the next line that
//! starts with `<digits>.`, meaning any numbered line, not only a known header. A numbered
//! list inside a paragraph therefore ends the section early. Callers rely on this.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::foresight::models::{OpportunityRecord, Scoring, DEFAULT_SCORE};

static OPPORTUNITY_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)OPPORTUNITY \d+:").expect("valid opportunity marker regex"));

/// A line that looks like the start of any real section. Only used to decide
/// whether the first block is preamble.
static PREAMBLE_PROBE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\d+\.\s*(DETAILED EXPLANATION|EVIDENCE|SEGMENT|TRIGGER|EARLY|STRATEGIC|MARKET|UNDERSERVED|SCORING|SCENARIO|REGULATORY)",
    )
    .expect("valid preamble regex")
});

static NUMBERED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.").expect("valid numbered line regex"));

static TITLE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[.*?\]\s*").expect("valid title prefix regex"));

static BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-•]\s*").expect("valid bullet regex"));

/// Score patterns for one label. `colon` reads the first integer after the
/// colon on the label's line, so digits inside the label (`Switch Cost (1-10): 7`)
/// are skipped. `bare` covers lines with no colon at all (`Switch Cost 12`).
struct ScorePattern {
    colon: Regex,
    bare: Regex,
}

impl ScorePattern {
    fn new(label: &str) -> Self {
        Self {
            colon: Regex::new(&format!(r"(?i){label}[^:\n]*:\s*(\d+)"))
                .expect("valid colon score regex"),
            bare: Regex::new(&format!(r"(?im){label}[^:\d\n]*(\d+)[^:\n]*$"))
                .expect("valid bare score regex"),
        }
    }
}

static TAM_SCORE: Lazy<ScorePattern> = Lazy::new(|| ScorePattern::new("TAM"));
static SWITCH_SCORE: Lazy<ScorePattern> = Lazy::new(|| ScorePattern::new("Switch"));
static MOAT_SCORE: Lazy<ScorePattern> = Lazy::new(|| ScorePattern::new("Moat"));

// ────────────────────────────────────────────────────────────────────────────
// Section table
// ────────────────────────────────────────────────────────────────────────────

/// The eleven numbered sections of an opportunity block, in prompt order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    DetailedExplanation = 0,
    EvidenceQuotes = 1,
    SegmentSizing = 2,
    TriggerEvents = 3,
    EarlyIndicators = 4,
    StrategicRelevance = 5,
    MarketMapping = 6,
    UnderservedSegmentStrategy = 7,
    Scoring = 8,
    ScenarioModeling = 9,
    RegulatoryContext = 10,
}

impl Section {
    pub const ALL: [Section; 11] = [
        Section::DetailedExplanation,
        Section::EvidenceQuotes,
        Section::SegmentSizing,
        Section::TriggerEvents,
        Section::EarlyIndicators,
        Section::StrategicRelevance,
        Section::MarketMapping,
        Section::UnderservedSegmentStrategy,
        Section::Scoring,
        Section::ScenarioModeling,
        Section::RegulatoryContext,
    ];

    /// Header text matched after the `<digits>.` prefix.
    pub fn header(self) -> &'static str {
        match self {
            Section::DetailedExplanation => "DETAILED EXPLANATION",
            Section::EvidenceQuotes => "EVIDENCE QUOTES",
            Section::SegmentSizing => "SEGMENT SIZING",
            Section::TriggerEvents => "TRIGGER EVENTS",
            Section::EarlyIndicators => "EARLY INDICATORS",
            Section::StrategicRelevance => "STRATEGIC RELEVANCE",
            Section::MarketMapping => "MARKET MAPPING",
            Section::UnderservedSegmentStrategy => "UNDERSERVED SEGMENT STRATEGY",
            Section::Scoring => "SCORING",
            Section::ScenarioModeling => "SCENARIO MODELING",
            Section::RegulatoryContext => "REGULATORY CONTEXT",
        }
    }

    /// Position of the section in the prompt, starting at 1.
    pub fn number(self) -> usize {
        self.index() + 1
    }

    fn index(self) -> usize {
        self as usize
    }
}

static HEADER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    Section::ALL
        .iter()
        .map(|section| {
            Regex::new(&format!(r"(?i)^\d+\.\s*{}", regex::escape(section.header())))
                .expect("valid section header regex")
        })
        .collect()
});

// ────────────────────────────────────────────────────────────────────────────
// Public API
// ────────────────────────────────────────────────────────────────────────────

/// Removes `**` and `*` emphasis markers and trims. Idempotent.
pub fn strip_markdown(text: &str) -> String {
    text.replace("**", "").replace('*', "").trim().to_string()
}

/// Parses a full generation response into opportunity records, in source order.
///
/// Never fails. Returns an empty vector for empty input, input without
/// `OPPORTUNITY N:` markers, or input that is nothing but preamble.
pub fn extract_opportunities(text: &str) -> Vec<OpportunityRecord> {
    OPPORTUNITY_MARKER
        .split(text)
        .filter(|block| !block.trim().is_empty())
        .enumerate()
        .filter_map(|(index, block)| {
            let lines: Vec<&str> = block
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect();

            if lines.is_empty() {
                return None;
            }

            // Only the first block is checked for preamble.
            if index == 0 && !lines.iter().any(|line| PREAMBLE_PROBE.is_match(line)) {
                return None;
            }

            Some(parse_block(&lines))
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Block parsing
// ────────────────────────────────────────────────────────────────────────────

/// Line ranges of every section found in one block.
struct BlockSections<'a> {
    lines: &'a [&'a str],
    spans: [Option<Range<usize>>; 11],
}

impl<'a> BlockSections<'a> {
    fn locate(lines: &'a [&'a str]) -> Self {
        let mut spans: [Option<Range<usize>>; 11] = Default::default();

        for (slot, pattern) in spans.iter_mut().zip(HEADER_PATTERNS.iter()) {
            *slot = lines
                .iter()
                .position(|line| pattern.is_match(line))
                .map(|header| header + 1..next_numbered_line(lines, header));
        }

        Self { lines, spans }
    }

    /// Content of a free-text section, or an empty string when the header is absent.
    fn text(&self, section: Section) -> String {
        match &self.spans[section.index()] {
            Some(span) => strip_markdown(&self.lines[span.clone()].join("\n")),
            None => String::new(),
        }
    }

    /// Bullet items of a list section.
    fn items(&self, section: Section) -> Vec<String> {
        split_bullets(&self.text(section))
    }
}

/// Index of the first line after `header` that starts with `<digits>.`, or the
/// end of the block.
fn next_numbered_line(lines: &[&str], header: usize) -> usize {
    lines
        .iter()
        .enumerate()
        .skip(header + 1)
        .find(|(_, line)| NUMBERED_LINE.is_match(line))
        .map(|(i, _)| i)
        .unwrap_or(lines.len())
}

fn parse_block(lines: &[&str]) -> OpportunityRecord {
    let title = strip_markdown(TITLE_PREFIX.replace(lines[0], "").trim());
    let sections = BlockSections::locate(lines);

    OpportunityRecord {
        title,
        explanation: sections.text(Section::DetailedExplanation),
        evidence_quotes: sections.items(Section::EvidenceQuotes),
        segment_sizing: sections.text(Section::SegmentSizing),
        trigger_events: sections.items(Section::TriggerEvents),
        early_indicators: sections.items(Section::EarlyIndicators),
        strategic_relevance: sections.text(Section::StrategicRelevance),
        market_mapping: sections.text(Section::MarketMapping),
        underserved_segment_strategy: sections.text(Section::UnderservedSegmentStrategy),
        scoring: parse_scoring(&sections.text(Section::Scoring)),
        scenario_modeling: sections.text(Section::ScenarioModeling),
        regulatory_context: sections.text(Section::RegulatoryContext),
    }
}

fn split_bullets(text: &str) -> Vec<String> {
    BULLET
        .split(text)
        .map(strip_markdown)
        .filter(|item| !item.is_empty())
        .collect()
}

fn parse_scoring(text: &str) -> Scoring {
    Scoring {
        tam: first_score(&TAM_SCORE, text),
        switch_cost: first_score(&SWITCH_SCORE, text),
        moat: first_score(&MOAT_SCORE, text),
    }
}

/// First integer for the label, saturating at `u32::MAX`. The capture is all
/// digits, so a failed parse can only mean overflow.
fn first_score(pattern: &ScorePattern, text: &str) -> u32 {
    pattern
        .colon
        .captures(text)
        .or_else(|| pattern.bare.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().parse().unwrap_or(u32::MAX))
        .unwrap_or(DEFAULT_SCORE)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn full_block(n: usize) -> String {
        format!(
            "OPPORTUNITY {n}: **Opportunity {n}**\n\
             1. DETAILED EXPLANATION\n\
             Explanation for {n}.\n\
             2. EVIDENCE QUOTES AND CITATIONS\n\
             - Quote A{n}\n\
             - Quote B{n}\n\
             3. SEGMENT SIZING\n\
             TAM of $4B.\n\
             4. TRIGGER EVENTS\n\
             - Trigger {n}\n\
             5. EARLY INDICATORS\n\
             • Indicator {n}\n\
             6. STRATEGIC RELEVANCE\n\
             Relevant.\n\
             7. MARKET MAPPING\n\
             Crowded.\n\
             8. UNDERSERVED SEGMENT STRATEGY\n\
             Rural buyers.\n\
             9. SCORING\n\
             - TAM (Total Addressable Market): {n}\n\
             - Switch Cost: 4\n\
             - Moat Potential: 6\n\
             10. SCENARIO MODELING\n\
             Base case holds.\n\
             11. REGULATORY CONTEXT\n\
             GDPR applies.\n"
        )
    }

    #[test]
    fn test_ten_well_formed_blocks_yield_ten_records_in_order() {
        let text: String = (1..=10).map(full_block).collect::<Vec<_>>().join("\n");
        let records = extract_opportunities(&text);

        assert_eq!(records.len(), 10);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.title, format!("Opportunity {}", i + 1));
            assert_eq!(record.scoring.tam, (i + 1) as u32);
        }
    }

    #[test]
    fn test_full_block_populates_every_field() {
        let records = extract_opportunities(&full_block(3));
        assert_eq!(records.len(), 1);
        let r = &records[0];

        assert_eq!(r.title, "Opportunity 3");
        assert_eq!(r.explanation, "Explanation for 3.");
        assert_eq!(r.evidence_quotes, vec!["Quote A3", "Quote B3"]);
        assert_eq!(r.segment_sizing, "TAM of $4B.");
        assert_eq!(r.trigger_events, vec!["Trigger 3"]);
        assert_eq!(r.early_indicators, vec!["Indicator 3"]);
        assert_eq!(r.strategic_relevance, "Relevant.");
        assert_eq!(r.market_mapping, "Crowded.");
        assert_eq!(r.underserved_segment_strategy, "Rural buyers.");
        assert_eq!(
            r.scoring,
            Scoring {
                tam: 3,
                switch_cost: 4,
                moat: 6
            }
        );
        assert_eq!(r.scenario_modeling, "Base case holds.");
        assert_eq!(r.regulatory_context, "GDPR applies.");
    }

    #[test]
    fn test_widget_example() {
        let input = "OPPORTUNITY 1: **Widget X**\n1. DETAILED EXPLANATION\nGrows fast.\n9. SCORING\nTAM: 8\nSwitch Cost: 3\nMoat: 7\n";
        let records = extract_opportunities(input);

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.title, "Widget X");
        assert_eq!(r.explanation, "Grows fast.");
        assert_eq!(
            r.scoring,
            Scoring {
                tam: 8,
                switch_cost: 3,
                moat: 7
            }
        );
        assert!(r.evidence_quotes.is_empty());
        assert!(r.trigger_events.is_empty());
        assert!(r.early_indicators.is_empty());
        assert_eq!(r.segment_sizing, "");
        assert_eq!(r.strategic_relevance, "");
        assert_eq!(r.market_mapping, "");
        assert_eq!(r.underserved_segment_strategy, "");
        assert_eq!(r.scenario_modeling, "");
        assert_eq!(r.regulatory_context, "");
    }

    #[test]
    fn test_mixed_bullets_in_evidence_section() {
        let input = "OPPORTUNITY 1: Title\n2. EVIDENCE QUOTES AND CITATIONS\n- Alpha\n- Beta\n• Gamma\n";
        let records = extract_opportunities(input);
        assert_eq!(records[0].evidence_quotes, vec!["Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn test_scoring_defaults_when_section_missing() {
        let input = "OPPORTUNITY 1: Title\n1. DETAILED EXPLANATION\nText\n";
        let records = extract_opportunities(input);
        assert_eq!(records[0].scoring, Scoring::default());
    }

    #[test]
    fn test_scoring_defaults_per_label_when_unparsable() {
        let input = "OPPORTUNITY 1: Title\n9. SCORING\nTAM: high\nSwitch Cost: 2\nMoat: unclear\n";
        let scoring = extract_opportunities(input)[0].scoring;
        assert_eq!(scoring.tam, 5);
        assert_eq!(scoring.switch_cost, 2);
        assert_eq!(scoring.moat, 5);
    }

    #[test]
    fn test_scoring_captures_multi_digit_numbers_whole() {
        let input = "OPPORTUNITY 1: Title\n9. SCORING\nTAM: 10\nSwitch Cost 12\nMoat Potential: 10/10\n";
        let scoring = extract_opportunities(input)[0].scoring;
        assert_eq!(scoring.tam, 10);
        assert_eq!(scoring.switch_cost, 12);
        assert_eq!(scoring.moat, 10);
    }

    #[test]
    fn test_scoring_skips_digits_inside_the_label() {
        let input = "OPPORTUNITY 1: Title\r\n9. SCORING\r\nTAM (1-10): 8\r\nSwitch Cost (1-10): 7\r\nMoat Potential (1-10): 6\r\n";
        let scoring = extract_opportunities(input)[0].scoring;
        assert_eq!(
            scoring,
            Scoring {
                tam: 8,
                switch_cost: 7,
                moat: 6
            }
        );
    }

    #[test]
    fn test_scoring_label_range_without_value_defaults() {
        let input = "OPPORTUNITY 1: Title\n9. SCORING\nSwitch Cost (1-10): high\nMoat: 3\n";
        let scoring = extract_opportunities(input)[0].scoring;
        assert_eq!(scoring.switch_cost, 5);
        assert_eq!(scoring.moat, 3);
    }

    #[test]
    fn test_scoring_saturates_oversized_numbers() {
        let input = "OPPORTUNITY 1: Title\r\n9. SCORING\r\nTAM: 99999999999\r\nSwitch Cost (1-10): 7\r\nMoat: 3\r\n";
        let scoring = extract_opportunities(input)[0].scoring;
        assert_eq!(
            scoring,
            Scoring {
                tam: u32::MAX,
                switch_cost: 7,
                moat: 3
            }
        );
    }

    #[test]
    fn test_section_numbers_follow_prompt_order() {
        for (i, section) in Section::ALL.iter().enumerate() {
            assert_eq!(section.index(), i);
            assert_eq!(section.number(), i + 1);
        }
        assert_eq!(Section::RegulatoryContext.number(), 11);
    }

    #[test]
    fn test_scoring_is_case_insensitive() {
        let input = "OPPORTUNITY 1: Title\n9. scoring\ntam: 9\nswitch cost: 1\nmoat: 2\n";
        let scoring = extract_opportunities(input)[0].scoring;
        assert_eq!((scoring.tam, scoring.switch_cost, scoring.moat), (9, 1, 2));
    }

    #[test]
    fn test_strip_markdown_is_idempotent() {
        for input in ["**bold** and *em*", "  ***x***  ", "plain", "", "* bullet"] {
            let once = strip_markdown(input);
            assert_eq!(strip_markdown(&once), once);
        }
        assert_eq!(strip_markdown("**bold** and *em*"), "bold and em");
    }

    #[test]
    fn test_stray_numbered_line_truncates_section() {
        let input = "OPPORTUNITY 1: Title\n\
                     1. DETAILED EXPLANATION\n\
                     First paragraph.\n\
                     2024. was a turning point\n\
                     Lost paragraph.\n\
                     6. STRATEGIC RELEVANCE\n\
                     Fits.\n";
        let r = &extract_opportunities(input)[0];
        assert_eq!(r.explanation, "First paragraph.");
        assert_eq!(r.strategic_relevance, "Fits.");
    }

    #[test]
    fn test_section_name_mid_paragraph_is_not_a_header() {
        let input = "OPPORTUNITY 1: Title\n\
                     1. DETAILED EXPLANATION\n\
                     See 3. SEGMENT SIZING below for numbers.\n";
        let r = &extract_opportunities(input)[0];
        assert_eq!(r.segment_sizing, "");
        assert_eq!(r.explanation, "See 3. SEGMENT SIZING below for numbers.");
    }

    #[test]
    fn test_leading_prose_is_dropped() {
        let input = format!(
            "Here is your strategic foresight scan for Acme.\nIt covers ten ideas.\n\n{}",
            full_block(1)
        );
        let records = extract_opportunities(&input);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Opportunity 1");
    }

    #[test]
    fn test_leading_prose_with_section_headers_becomes_a_record() {
        let input = format!("Intro\n1. DETAILED EXPLANATION\nStray\n{}", full_block(1));
        let records = extract_opportunities(&input);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "Intro");
    }

    #[test]
    fn test_only_first_block_is_checked_for_headers() {
        let input = format!("{}OPPORTUNITY 2: Bare Title\nNo sections here.\n", full_block(1));
        let records = extract_opportunities(&input);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].title, "Bare Title");
        assert_eq!(records[1].explanation, "");
    }

    #[test]
    fn test_empty_and_marker_free_input_yield_nothing() {
        assert!(extract_opportunities("").is_empty());
        assert!(extract_opportunities("   \n\n ").is_empty());
        assert!(extract_opportunities("The model refused to answer.").is_empty());
    }

    #[test]
    fn test_marker_is_case_insensitive() {
        let input = "opportunity 1: Lower\n1. DETAILED EXPLANATION\nx\nOpportunity 2: Mixed\n";
        let records = extract_opportunities(input);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].title, "Mixed");
    }

    #[test]
    fn test_title_bracket_prefix_and_emphasis_removed() {
        let input = "OPPORTUNITY 1: [Tier 1] **Net-Zero Hotels**\n1. DETAILED EXPLANATION\nx\n";
        assert_eq!(extract_opportunities(input)[0].title, "Net-Zero Hotels");
    }

    #[test]
    fn test_free_text_section_keeps_line_breaks() {
        let input = "OPPORTUNITY 1: T\n10. SCENARIO MODELING\nBASE CASE: steady\n**UPSIDE CASE**: fast\n";
        assert_eq!(
            extract_opportunities(input)[0].scenario_modeling,
            "BASE CASE: steady\nUPSIDE CASE: fast"
        );
    }

    #[test]
    fn test_section_header_with_no_space_after_dot() {
        let input = "OPPORTUNITY 1: T\n4.TRIGGER EVENTS\n- Rates drop\n";
        assert_eq!(extract_opportunities(input)[0].trigger_events, vec!["Rates drop"]);
    }

    #[test]
    fn test_section_number_follows_prompt_order() {
        assert_eq!(Section::DetailedExplanation.number(), 1);
        assert_eq!(Section::Scoring.number(), 9);
        assert_eq!(Section::RegulatoryContext.number(), 11);
    }
}
