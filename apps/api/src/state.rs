use crate::llm_client::GatewayHandle;

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once at startup and read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Completion gateway; may be unavailable, in which case analyses degrade.
    pub gateway: GatewayHandle,
}
