// Prompt constants for the foresight scan.
// Both backends receive the same system instruction and user template.

/// System instruction sent with every foresight generation request.
pub const FORESIGHT_SYSTEM: &str = "You are a world-class strategic foresight expert \
    specializing in opportunity identification and market analysis. \
    Your expertise spans technology trends, business models, competitive dynamics, \
    regulatory environments, and market sizing. \
    You generate data-driven, actionable insights with specific examples, numbers, \
    and real-world evidence.";

/// Foresight scan template. Replace `{client_name}` and `{context}` before sending.
pub const FORESIGHT_PROMPT_TEMPLATE: &str = r#"Perform a comprehensive strategic foresight scan for {client_name}. Generate exactly 10 distinct opportunity concepts with COMPLETE, DETAILED analysis for every single field. Each opportunity must be unique and substantive.

Context: {context}

CRITICAL: Every section below MUST be filled with substantial, specific content. Do not use placeholders or generic statements. Provide real industry data, specific examples, named competitors, actual regulations, and concrete market sizes.

Format each opportunity exactly as shown:

OPPORTUNITY [NUMBER]: [Specific, Compelling Title - No Generic Phrases]

1. DETAILED EXPLANATION
Write 3-4 paragraphs explaining:
- What this opportunity is and why it exists now
- The underlying technology, market shift, or customer need driving it
- How {client_name} could capitalize on this opportunity
- Specific business model or approach to capture value

2. EVIDENCE QUOTES AND CITATIONS
Provide 3-5 bullet points with:
- Specific market research findings with sources (e.g., "Gartner predicts...")
- Industry expert quotes or analyst reports
- Real company examples demonstrating this trend
- Statistical data supporting the opportunity size

3. SEGMENT SIZING
Provide detailed market sizing:
- Total Addressable Market (TAM) with specific dollar figures
- Serviceable Addressable Market (SAM) breakdown
- Target customer segments with estimated numbers
- Growth rate projections for next 3-5 years
- Geographic markets and their relative sizes

4. TRIGGER EVENTS
List 4-6 specific events that could accelerate this opportunity:
- Technology milestones (e.g., "5G deployment reaches 50% coverage")
- Regulatory changes (e.g., "New privacy laws enacted in EU")
- Market shifts (e.g., "Major competitor exits market")
- Economic factors (e.g., "Interest rates drop below 2%")

5. EARLY INDICATORS
List 4-6 observable signals to monitor:
- Specific metrics to track (e.g., "Google search volume for X increases 50%")
- Pilot programs or early adopters to watch
- Patent filings or research publications
- Investment trends or funding announcements
- Customer behavior changes

6. STRATEGIC RELEVANCE
Explain in 2-3 paragraphs:
- How this aligns with {client_name}'s core capabilities and assets
- Competitive advantages {client_name} brings to this opportunity
- Strategic positioning and differentiation potential
- Long-term value creation for {client_name}'s business

7. MARKET MAPPING
Provide competitive landscape analysis:
- List 3-5 current competitors or adjacent players
- Identify white space gaps in the market
- Map solution types and positioning (e.g., premium vs. budget)
- Describe barriers to entry and competitive moats
- Partnership opportunities

8. UNDERSERVED SEGMENT STRATEGY
Detail specific underserved segments:
- Identify 2-3 specific customer groups being overlooked
- Explain why they are underserved and their pain points
- Describe tailored solutions for each segment
- Estimate revenue potential for these segments
- Go-to-market approach for reaching them

9. SCORING
Provide numerical scores with brief justification:
- TAM (Total Addressable Market): [1-10] - (1=<$100M, 10=$10B+)
- Switch Cost: [1-10] - (1=easy to switch, 10=very sticky)
- Moat Potential: [1-10] - (1=highly competitive, 10=defensible monopoly)

10. SCENARIO MODELING
Describe 3 scenarios (2-3 sentences each):
- BASE CASE: Most likely outcome and timeline
- UPSIDE CASE: Accelerated adoption scenario
- DOWNSIDE CASE: Slower adoption or competitive risks

11. REGULATORY CONTEXT
Provide regulatory analysis:
- List specific regulations that apply (name them)
- Compliance requirements and costs
- Regulatory risks or uncertainties
- Favorable regulations or incentives
- International regulatory differences if relevant

---

Generate all 10 opportunities now with COMPLETE information in every field. Do not leave any section empty or with placeholder text. Be specific, use real examples, and provide substantial detail throughout."#;

/// Fills the foresight template for one client. Pure and deterministic.
pub fn build_foresight_prompt(client_name: &str, context: &str) -> String {
    // Context first, so a client name containing "{context}" is not expanded.
    FORESIGHT_PROMPT_TEMPLATE
        .replace("{context}", context)
        .replace("{client_name}", client_name)
}
