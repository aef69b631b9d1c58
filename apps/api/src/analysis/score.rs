//! Score normalization — turns the model's raw score token into a qualitative tier.

use serde::{Deserialize, Serialize};

/// Scores at or above this are High.
const HIGH_THRESHOLD: u32 = 80;
/// Scores at or above this (and below HIGH) are Medium.
const MEDIUM_THRESHOLD: u32 = 60;
/// Longer digit runs are truncated to this many digits.
const MAX_SCORE_DIGITS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreClass {
    High,
    Medium,
    Low,
    Unknown,
}

impl ScoreClass {
    /// Classifies a raw score token such as `"85"`, `"85/100"` or `"Score is 72."`.
    ///
    /// Total: any input without a usable number yields `Unknown`.
    pub fn classify(raw: &str) -> Self {
        match extract_score(raw) {
            Some(score) if score >= HIGH_THRESHOLD => ScoreClass::High,
            Some(score) if score >= MEDIUM_THRESHOLD => ScoreClass::Medium,
            Some(_) => ScoreClass::Low,
            None => ScoreClass::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreClass::High => "High",
            ScoreClass::Medium => "Medium",
            ScoreClass::Low => "Low",
            ScoreClass::Unknown => "N/A",
        }
    }
}

/// First contiguous run of ASCII digits in `raw`, cut to `MAX_SCORE_DIGITS`.
fn extract_score(raw: &str) -> Option<u32> {
    let start = raw.find(|c: char| c.is_ascii_digit())?;
    let digits: String = raw[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .take(MAX_SCORE_DIGITS)
        .collect();
    digits.parse().ok()
}
