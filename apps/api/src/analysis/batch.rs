//! Batch Orchestrator — analyzes the first few leads of an upload, one at a time.
//!
//! Flow per lead: build_prompt → gateway.complete → parse_response → ScoreClass::classify.
//!
//! Leads are processed strictly in input order with a fixed pause between them.
//! A failure for one lead is recorded in that lead's result and never stops the batch.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::analysis::models::{
    AnalysisResult, ClientProfile, EmailStyle, LeadRecord, ParsedSections,
};
use crate::analysis::prompt_builder::build_prompt;
use crate::analysis::response_parser::parse_response;
use crate::llm_client::{GatewayError, GatewayHandle};

/// Only this many leads from the head of an upload are analyzed.
pub const MAX_LEADS_PER_BATCH: usize = 3;
/// Pause between consecutive lead analyses.
pub const PACING_DELAY: Duration = Duration::from_secs(1);
/// Stand-in completion when the gateway is absent; parses to an empty result.
pub const UNAVAILABLE_COMPLETION: &str = "OpenAI API not available";

/// One emitted batch item.
#[derive(Debug, Clone, Serialize)]
pub struct LeadAnalysis {
    #[serde(flatten)]
    pub lead: LeadRecord,
    pub analysis: AnalysisResult,
}

/// Lazy, sequential run over the head of a lead list. Call `next` until it returns `None`.
///
/// The pacing delay is taken at the start of every `next` call after the first,
/// so no time is spent after the final lead.
pub struct BatchRun<'a> {
    client: &'a ClientProfile,
    style: &'a EmailStyle,
    gateway: &'a GatewayHandle,
    leads: std::iter::Take<std::slice::Iter<'a, LeadRecord>>,
    emitted: usize,
}

impl<'a> BatchRun<'a> {
    pub fn new(
        client: &'a ClientProfile,
        style: &'a EmailStyle,
        leads: &'a [LeadRecord],
        gateway: &'a GatewayHandle,
    ) -> Self {
        Self {
            client,
            style,
            gateway,
            leads: leads.iter().take(MAX_LEADS_PER_BATCH),
            emitted: 0,
        }
    }

    pub async fn next(&mut self) -> Option<LeadAnalysis> {
        let lead = self.leads.next()?;

        if self.emitted > 0 {
            tokio::time::sleep(PACING_DELAY).await;
        }

        let analysis = analyze_lead(self.client, self.style, lead, self.gateway).await;
        self.emitted += 1;

        Some(LeadAnalysis {
            lead: lead.clone(),
            analysis,
        })
    }
}

/// Runs the whole batch and collects the results in input order.
pub async fn run_batch(
    client: &ClientProfile,
    style: &EmailStyle,
    leads: &[LeadRecord],
    gateway: &GatewayHandle,
) -> Vec<LeadAnalysis> {
    let mut run = BatchRun::new(client, style, leads, gateway);
    let mut results = Vec::with_capacity(leads.len().min(MAX_LEADS_PER_BATCH));
    while let Some(item) = run.next().await {
        results.push(item);
    }
    results
}

/// Analyzes a single lead. Never fails; gateway problems become part of the result.
pub async fn analyze_lead(
    client: &ClientProfile,
    style: &EmailStyle,
    lead: &LeadRecord,
    gateway: &GatewayHandle,
) -> AnalysisResult {
    info!("Analyzing {}", lead.company_name);
    let prompt = build_prompt(client, style, lead);
    debug!("Prompt for {}:\n{}", lead.company_name, prompt);

    let result = match gateway.complete(&prompt).await {
        Ok(completion) => {
            debug!("Completion for {}:\n{}", lead.company_name, completion);
            AnalysisResult::from_sections(parse_response(&completion), None)
        }
        Err(GatewayError::Unavailable) => AnalysisResult::from_sections(
            parse_response(UNAVAILABLE_COMPLETION),
            Some(GatewayError::Unavailable.to_string()),
        ),
        Err(e) => {
            warn!("Completion failed for {}: {e}", lead.company_name);
            let message = format!("Error: {e}");
            let sections = ParsedSections {
                reasoning: message.clone(),
                ..ParsedSections::default()
            };
            AnalysisResult::from_sections(sections, Some(message))
        }
    };

    info!(
        "Analyzed {}: score={} ({})",
        lead.company_name,
        result.score,
        result.score_class.label()
    );
    result
}
