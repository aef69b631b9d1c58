//! Response Parser — splits a raw completion into its labeled sections.
//!
//! Single forward pass over lines with a "current section" pointer. Markers
//! must start the line exactly (case-sensitive, no leading whitespace).

use crate::analysis::models::ParsedSections;
use crate::analysis::prompts::{
    EMAIL_1_MARKER, EMAIL_2_MARKER, PAIN_POINTS_MARKER, REASONING_MARKER, SCORE_MARKER,
};

/// Body sections that accumulate lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Reasoning,
    PainPoints,
    Email1,
    Email2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Score,
    Body(Section),
}

/// Checked in order; the first matching prefix wins.
const MARKERS: &[(&str, Marker)] = &[
    (SCORE_MARKER, Marker::Score),
    (REASONING_MARKER, Marker::Body(Section::Reasoning)),
    (PAIN_POINTS_MARKER, Marker::Body(Section::PainPoints)),
    (EMAIL_1_MARKER, Marker::Body(Section::Email1)),
    (EMAIL_2_MARKER, Marker::Body(Section::Email2)),
];

/// Parses a completion into sections. Never fails: missing sections stay empty
/// and a missing score stays `"N/A"`.
///
/// Text on the same line as a body marker is dropped. A repeated marker appends
/// to the section it names; a repeated `SCORE:` line replaces the score.
pub fn parse_response(text: &str) -> ParsedSections {
    let mut sections = ParsedSections::default();
    let mut current: Option<Section> = None;

    for line in text.split('\n') {
        match match_marker(line) {
            Some((Marker::Score, rest)) => {
                sections.score = rest.trim().to_string();
                current = None;
            }
            Some((Marker::Body(section), _)) => current = Some(section),
            None => {
                if let Some(section) = current {
                    let buf = accumulator(&mut sections, section);
                    buf.push_str(line);
                    buf.push('\n');
                }
            }
        }
    }

    sections
}

fn match_marker(line: &str) -> Option<(Marker, &str)> {
    MARKERS
        .iter()
        .find_map(|(prefix, marker)| line.strip_prefix(*prefix).map(|rest| (*marker, rest)))
}

fn accumulator(sections: &mut ParsedSections, section: Section) -> &mut String {
    match section {
        Section::Reasoning => &mut sections.reasoning,
        Section::PainPoints => &mut sections.pain_points,
        Section::Email1 => &mut sections.email1,
        Section::Email2 => &mut sections.email2,
    }
}
