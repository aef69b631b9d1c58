// Prompt template and section markers for lead analysis.
// The markers are shared with the response parser: change both or neither.

pub const SCORE_MARKER: &str = "SCORE:";
pub const REASONING_MARKER: &str = "REASONING:";
pub const PAIN_POINTS_MARKER: &str = "PAIN POINTS:";
pub const EMAIL_1_MARKER: &str = "EMAIL 1:";
pub const EMAIL_2_MARKER: &str = "EMAIL 2:";

pub const CTA_INCLUDED: &str = "Include CTA.";
pub const CTA_EXCLUDED: &str = "No strong CTA.";

/// Lead analysis prompt. Replace every `{placeholder}` before sending.
pub const LEAD_ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are a B2B sales strategist. Analyze the lead and write copy.

CLIENT:
- Product: {offer}
- ICP: {icp_keywords}
- Size: {target_size}

LEAD:
- Company: {company}
- Industry: {industry}
- URL: {url}

Write:
1. Score (0-100)
2. Reason for score
3. 3 common pain points
4. Two email drafts in {tone} tone and {length} length
{cta_instruction}

Format:
SCORE:
REASONING:
PAIN POINTS:
EMAIL 1:
EMAIL 2:
"#;
