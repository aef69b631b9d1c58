//! Lead ingestion — turns an uploaded CSV into `LeadRecord`s.
//!
//! Validation runs before any analysis: a missing required column or a blank
//! required cell rejects the whole upload.

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use tracing::info;

use crate::analysis::models::LeadRecord;
use crate::errors::AppError;

pub const COMPANY_NAME_COLUMN: &str = "Company Name";
pub const INDUSTRY_COLUMN: &str = "Industry";
/// URL columns, in preference order.
pub const URL_COLUMNS: &[&str] = &["Website", "LinkedIn URL"];

/// Number of rows echoed back by `preview`.
pub const PREVIEW_ROWS: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct LeadPreview {
    pub total_leads: usize,
    pub preview: Vec<LeadRecord>,
}

/// Column positions resolved from the header row.
struct Columns {
    company_name: usize,
    industry: usize,
    urls: Vec<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self, AppError> {
        let position = |name: &str| headers.iter().position(|h| h == name);

        let company_name = position(COMPANY_NAME_COLUMN);
        let industry = position(INDUSTRY_COLUMN);

        match (company_name, industry) {
            (Some(company_name), Some(industry)) => Ok(Self {
                company_name,
                industry,
                urls: URL_COLUMNS.iter().filter_map(|c| position(c)).collect(),
            }),
            _ => {
                let missing: Vec<&str> = [
                    (company_name, COMPANY_NAME_COLUMN),
                    (industry, INDUSTRY_COLUMN),
                ]
                .iter()
                .filter(|(pos, _)| pos.is_none())
                .map(|(_, name)| *name)
                .collect();
                Err(AppError::Validation(format!(
                    "Required columns missing: {}",
                    missing.join(", ")
                )))
            }
        }
    }

    fn lead(&self, row: usize, record: &StringRecord) -> Result<LeadRecord, AppError> {
        let cell = |idx: usize| record.get(idx).unwrap_or("").to_string();

        let company_name = cell(self.company_name);
        let industry = cell(self.industry);
        if company_name.is_empty() || industry.is_empty() {
            return Err(AppError::Validation(format!(
                "Row {row}: {COMPANY_NAME_COLUMN} and {INDUSTRY_COLUMN} must not be empty"
            )));
        }

        let url = self
            .urls
            .iter()
            .map(|&idx| cell(idx))
            .find(|v| !v.is_empty())
            .unwrap_or_default();

        Ok(LeadRecord {
            company_name,
            industry,
            url,
        })
    }
}

/// Parses CSV text with a header row into leads, in file order.
pub fn parse_leads(csv_text: &str) -> Result<Vec<LeadRecord>, AppError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(csv_text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::Validation(format!("Invalid CSV header: {e}")))?
        .clone();
    let columns = Columns::from_headers(&headers)
        .inspect_err(|e| info!("Lead upload rejected: {e}"))?;

    let mut leads = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let row = idx + 1;
        let record =
            record.map_err(|e| AppError::Validation(format!("Row {row}: invalid CSV: {e}")))?;
        leads.push(columns.lead(row, &record)?);
    }

    info!("Loaded {} leads", leads.len());
    Ok(leads)
}

/// Lead count plus the first `PREVIEW_ROWS` leads.
pub fn preview(leads: &[LeadRecord]) -> LeadPreview {
    LeadPreview {
        total_leads: leads.len(),
        preview: leads.iter().take(PREVIEW_ROWS).cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_required_and_url_columns() {
        let csv = "Company Name,Industry,Website\nAcme,Retail,https://acme.example\nGlobex,Energy,\n";
        let leads = parse_leads(csv).unwrap();
        assert_eq!(leads.len(), 2);
        assert_eq!(leads[0].company_name, "Acme");
        assert_eq!(leads[0].industry, "Retail");
        assert_eq!(leads[0].url, "https://acme.example");
        assert_eq!(leads[1].url, "");
    }

    #[test]
    fn test_linkedin_used_when_website_blank() {
        let csv = "Company Name,Industry,Website,LinkedIn URL\n\
                   Acme,Retail,,https://linkedin.com/company/acme\n\
                   Globex,Energy,https://globex.example,https://linkedin.com/company/globex\n";
        let leads = parse_leads(csv).unwrap();
        assert_eq!(leads[0].url, "https://linkedin.com/company/acme");
        assert_eq!(leads[1].url, "https://globex.example");
    }

    #[test]
    fn test_no_url_columns() {
        let leads = parse_leads("Industry,Company Name\nRetail,Acme\n").unwrap();
        assert_eq!(leads[0].company_name, "Acme");
        assert_eq!(leads[0].url, "");
    }

    #[test]
    fn test_missing_required_columns() {
        let err = parse_leads("Company Name,Website\nAcme,https://acme.example\n").unwrap_err();
        match err {
            AppError::Validation(msg) => assert_eq!(msg, "Required columns missing: Industry"),
            other => panic!("unexpected error: {other:?}"),
        }

        let err = parse_leads("Name,Sector\nAcme,Retail\n").unwrap_err();
        match err {
            AppError::Validation(msg) => {
                assert_eq!(msg, "Required columns missing: Company Name, Industry")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_blank_required_cell_names_row() {
        let err = parse_leads("Company Name,Industry\nAcme,Retail\n  ,Energy\n").unwrap_err();
        match err {
            AppError::Validation(msg) => assert!(msg.starts_with("Row 2:"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_ragged_row_is_validation_error() {
        let err = parse_leads("Company Name,Industry\nAcme,Retail,extra\n").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_header_only_is_empty_batch() {
        assert!(parse_leads("Company Name,Industry\n").unwrap().is_empty());
    }

    #[test]
    fn test_quoted_fields() {
        let leads = parse_leads("Company Name,Industry\n\"Smith, Jones & Co\",Legal\n").unwrap();
        assert_eq!(leads[0].company_name, "Smith, Jones & Co");
    }

    #[test]
    fn test_preview_caps_rows() {
        let mut csv = String::from("Company Name,Industry\n");
        for i in 0..8 {
            csv.push_str(&format!("Company {i},SaaS\n"));
        }
        let leads = parse_leads(&csv).unwrap();
        let preview = preview(&leads);
        assert_eq!(preview.total_leads, 8);
        assert_eq!(preview.preview.len(), PREVIEW_ROWS);
        assert_eq!(preview.preview[0].company_name, "Company 0");
    }
}
