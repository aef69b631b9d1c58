pub mod health;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::errors::AppError;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/status", get(handlers::handle_gateway_status))
        // Lead API
        .route("/api/v1/leads/preview", post(handlers::handle_preview_leads))
        .route("/api/v1/leads/analyze", post(handlers::handle_analyze_leads))
        .route("/api/v1/prompt/preview", post(handlers::handle_prompt_preview))
        .fallback(not_found)
        .with_state(state)
}
