//! GET /health — store size and provider probes. Always answers 200.

use std::sync::Arc;

use ai_llm_service::health_service::HealthStatus;
use axum::{Json, extract::State};
use serde::Serialize;
use tracing::warn;

use crate::core::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Store reachable and every provider probe succeeded.
    pub ok: bool,
    /// Chunks in the store; `None` if the count failed.
    pub chunks: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_error: Option<String>,
    pub providers: Vec<HealthStatus>,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let (chunks, store_error) = match state.store.count().await {
        Ok(n) => (Some(n), None),
        Err(e) => {
            warn!(error = %e, "health: store count failed");
            (None, Some(e.to_string()))
        }
    };
    let providers = state.llm_profiles.health_all().await;
    let ok = chunks.is_some() && providers.iter().all(|p| p.ok);

    Json(HealthResponse {
        ok,
        chunks,
        store_error,
        providers,
    })
}
