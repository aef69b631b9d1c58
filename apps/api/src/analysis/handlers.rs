//! Axum route handlers for the lead analysis API.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::batch::{run_batch, LeadAnalysis};
use crate::analysis::models::{ClientProfile, EmailStyle, LeadRecord};
use crate::analysis::prompt_builder::build_prompt;
use crate::errors::AppError;
use crate::leads::ingest::{parse_leads, preview, LeadPreview};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LeadUploadRequest {
    pub csv: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub csv: String,
    #[serde(default)]
    pub client: ClientProfile,
    #[serde(default)]
    pub style: EmailStyle,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub batch_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub total_leads: usize,
    pub gateway: String,
    pub results: Vec<LeadAnalysis>,
}

#[derive(Debug, Deserialize)]
pub struct PromptPreviewRequest {
    pub lead: LeadRecord,
    #[serde(default)]
    pub client: ClientProfile,
    #[serde(default)]
    pub style: EmailStyle,
}

#[derive(Debug, Serialize)]
pub struct PromptPreviewResponse {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct GatewayStatusResponse {
    pub gateway_available: bool,
    pub message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/status
pub async fn handle_gateway_status(State(state): State<AppState>) -> Json<GatewayStatusResponse> {
    Json(GatewayStatusResponse {
        gateway_available: state.gateway.is_available(),
        message: state.gateway.status().to_string(),
    })
}

/// POST /api/v1/leads/preview
///
/// Validates an upload and echoes the lead count and first rows. No analysis.
pub async fn handle_preview_leads(
    Json(request): Json<LeadUploadRequest>,
) -> Result<Json<LeadPreview>, AppError> {
    let leads = parse_leads(&request.csv)?;
    Ok(Json(preview(&leads)))
}

/// POST /api/v1/leads/analyze
///
/// Validates the upload, then analyzes the first leads sequentially.
/// Per-lead gateway failures are reported inside each result.
pub async fn handle_analyze_leads(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let leads = parse_leads(&request.csv)?;

    let batch_id = Uuid::new_v4();
    let started_at = Utc::now();
    info!("Batch {batch_id}: {} leads uploaded", leads.len());

    let results = run_batch(&request.client, &request.style, &leads, &state.gateway).await;

    info!("Batch {batch_id}: {} leads analyzed", results.len());

    Ok(Json(AnalyzeResponse {
        batch_id,
        started_at,
        total_leads: leads.len(),
        gateway: state.gateway.status().to_string(),
        results,
    }))
}

/// POST /api/v1/prompt/preview
///
/// Renders the exact prompt a lead would be analyzed with, without calling the model.
pub async fn handle_prompt_preview(
    Json(request): Json<PromptPreviewRequest>,
) -> Json<PromptPreviewResponse> {
    Json(PromptPreviewResponse {
        prompt: build_prompt(&request.client, &request.style, &request.lead),
    })
}
