//! Shared data models for lead analysis: the client's ICP profile, the outreach
//! style settings, a single lead row, and the per-lead analysis result.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analysis::score::ScoreClass;

// ────────────────────────────────────────────────────────────────────────────
// Client configuration
// ────────────────────────────────────────────────────────────────────────────

/// Company size bucket the client is targeting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetSize {
    #[default]
    Startup,
    Small,
    Mid,
    Enterprise,
    Any,
}

/// Voice used for the drafted outreach emails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tone {
    #[default]
    Professional,
    Friendly,
    Direct,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmailLength {
    #[default]
    Short,
    Medium,
    Long,
}

// The variant names are interpolated into the prompt verbatim.
impl fmt::Display for TargetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TargetSize::Startup => "Startup",
            TargetSize::Small => "Small",
            TargetSize::Mid => "Mid",
            TargetSize::Enterprise => "Enterprise",
            TargetSize::Any => "Any",
        };
        f.write_str(s)
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Tone::Professional => "Professional",
            Tone::Friendly => "Friendly",
            Tone::Direct => "Direct",
        };
        f.write_str(s)
    }
}

impl fmt::Display for EmailLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EmailLength::Short => "Short",
            EmailLength::Medium => "Medium",
            EmailLength::Long => "Long",
        };
        f.write_str(s)
    }
}

/// What the client sells and who they sell it to. Fixed for a whole batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientProfile {
    pub offer: String,
    pub icp_keywords: String,
    pub target_size: TargetSize,
}

impl Default for ClientProfile {
    fn default() -> Self {
        Self {
            offer: "CRM for SMBs".to_string(),
            icp_keywords: "SaaS, startup, HubSpot".to_string(),
            target_size: TargetSize::default(),
        }
    }
}

/// Outreach email settings. Fixed for a whole batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailStyle {
    pub tone: Tone,
    pub length: EmailLength,
    pub include_cta: bool,
}

impl Default for EmailStyle {
    fn default() -> Self {
        Self {
            tone: Tone::default(),
            length: EmailLength::default(),
            include_cta: true,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Lead input / analysis output
// ────────────────────────────────────────────────────────────────────────────

/// One prospective customer row. `url` is empty when the source had none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub company_name: String,
    pub industry: String,
    #[serde(default)]
    pub url: String,
}

/// Sentinel score used when the model reply has no `SCORE:` line.
pub const SCORE_NOT_AVAILABLE: &str = "N/A";

/// The five sections recovered from a completion, before score classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedSections {
    pub score: String,
    pub reasoning: String,
    pub pain_points: String,
    pub email1: String,
    pub email2: String,
}

impl Default for ParsedSections {
    fn default() -> Self {
        Self {
            score: SCORE_NOT_AVAILABLE.to_string(),
            reasoning: String::new(),
            pain_points: String::new(),
            email1: String::new(),
            email2: String::new(),
        }
    }
}

/// Final, display-ready analysis for one lead. Built once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    pub score: String,
    pub score_class: ScoreClass,
    pub reasoning: String,
    pub pain_points: String,
    pub email1: String,
    pub email2: String,
    /// Gateway failure for this lead, if any. Never aborts the batch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisResult {
    pub fn from_sections(sections: ParsedSections, error: Option<String>) -> Self {
        let score_class = ScoreClass::classify(&sections.score);
        Self {
            score: sections.score,
            score_class,
            reasoning: sections.reasoning,
            pain_points: sections.pain_points,
            email1: sections.email1,
            email2: sections.email2,
            error,
        }
    }
}
