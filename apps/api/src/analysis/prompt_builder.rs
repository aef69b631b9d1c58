//! Prompt Builder — renders the lead analysis prompt for one lead.

use crate::analysis::models::{ClientProfile, EmailStyle, LeadRecord};
use crate::analysis::prompts::{CTA_EXCLUDED, CTA_INCLUDED, LEAD_ANALYSIS_PROMPT_TEMPLATE};

/// Builds the analysis prompt. Field values are interpolated verbatim, empty or not.
pub fn build_prompt(client: &ClientProfile, style: &EmailStyle, lead: &LeadRecord) -> String {
    let cta_instruction = if style.include_cta {
        CTA_INCLUDED
    } else {
        CTA_EXCLUDED
    };

    let fields: [(&str, String); 9] = [
        ("{target_size}", client.target_size.to_string()),
        ("{tone}", style.tone.to_string()),
        ("{length}", style.length.to_string()),
        ("{cta_instruction}", cta_instruction.to_string()),
        ("{offer}", client.offer.clone()),
        ("{icp_keywords}", client.icp_keywords.clone()),
        ("{company}", lead.company_name.clone()),
        ("{industry}", lead.industry.clone()),
        ("{url}", lead.url.clone()),
    ];

    render(LEAD_ANALYSIS_PROMPT_TEMPLATE, &fields)
}

/// Single pass over the template; substituted values are never rescanned.
fn render(template: &str, fields: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len() + 256);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let candidate = &rest[open..];
        match fields.iter().find(|(key, _)| candidate.starts_with(*key)) {
            Some((key, value)) => {
                out.push_str(value);
                rest = &candidate[key.len()..];
            }
            None => {
                out.push('{');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::models::{EmailLength, TargetSize, Tone};
    use crate::analysis::prompts::{
        EMAIL_1_MARKER, EMAIL_2_MARKER, PAIN_POINTS_MARKER, REASONING_MARKER, SCORE_MARKER,
    };

    fn lead() -> LeadRecord {
        LeadRecord {
            company_name: "Northwind Traders".to_string(),
            industry: "Logistics".to_string(),
            url: "https://northwind.example".to_string(),
        }
    }

    fn client() -> ClientProfile {
        ClientProfile {
            offer: "Fleet telematics".to_string(),
            icp_keywords: "3PL, trucking, Samsara".to_string(),
            target_size: TargetSize::Mid,
        }
    }

    #[test]
    fn test_prompt_embeds_all_fields_verbatim() {
        let style = EmailStyle {
            tone: Tone::Friendly,
            length: EmailLength::Long,
            include_cta: true,
        };
        let prompt = build_prompt(&client(), &style, &lead());

        assert!(prompt.contains("- Product: Fleet telematics"));
        assert!(prompt.contains("- ICP: 3PL, trucking, Samsara"));
        assert!(prompt.contains("- Size: Mid"));
        assert!(prompt.contains("- Company: Northwind Traders"));
        assert!(prompt.contains("- Industry: Logistics"));
        assert!(prompt.contains("- URL: https://northwind.example"));
        assert!(prompt.contains("in Friendly tone and Long length"));
        assert!(prompt.contains(CTA_INCLUDED));
        assert!(!prompt.contains(CTA_EXCLUDED));
        assert!(!prompt.contains('{'), "unrendered placeholder in: {prompt}");
    }

    #[test]
    fn test_prompt_without_cta() {
        let style = EmailStyle {
            include_cta: false,
            ..EmailStyle::default()
        };
        let prompt = build_prompt(&client(), &style, &lead());
        assert!(prompt.contains(CTA_EXCLUDED));
        assert!(!prompt.contains(CTA_INCLUDED));
    }

    #[test]
    fn test_prompt_lists_markers_in_order() {
        let prompt = build_prompt(&client(), &EmailStyle::default(), &lead());
        let positions: Vec<usize> = [
            SCORE_MARKER,
            REASONING_MARKER,
            PAIN_POINTS_MARKER,
            EMAIL_1_MARKER,
            EMAIL_2_MARKER,
        ]
        .iter()
        .map(|m| prompt.find(&format!("\n{m}\n")).expect("marker line missing"))
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_empty_fields_are_interpolated() {
        let lead = LeadRecord {
            company_name: "Acme".to_string(),
            industry: "Retail".to_string(),
            url: String::new(),
        };
        let prompt = build_prompt(&client(), &EmailStyle::default(), &lead);
        assert!(prompt.contains("- URL: \n"));
    }

    #[test]
    fn test_placeholder_lookalikes_in_input_are_not_expanded() {
        let client = ClientProfile {
            offer: "Templates like {company}".to_string(),
            ..client()
        };
        let prompt = build_prompt(&client, &EmailStyle::default(), &lead());
        assert!(prompt.contains("- Product: Templates like {company}"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let a = build_prompt(&client(), &EmailStyle::default(), &lead());
        let b = build_prompt(&client(), &EmailStyle::default(), &lead());
        assert_eq!(a, b);
    }
}
