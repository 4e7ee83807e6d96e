//! POST /chat — one grounded answer per message.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{core::app_state::AppState, error_handler::AppResult};

/// Request payload for /chat.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Response payload for /chat.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Handler: POST /chat
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/chat \
///   -H 'content-type: application/json' \
///   -d '{"message":"When was the company founded?"}'
/// ```
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    let Json(body) = payload?;
    debug!(message_len = body.message.len(), "chat: start");

    let response = state.pipeline.handle(&body.message).await?;

    info!(response_len = response.len(), "chat: answered");
    Ok(Json(ChatResponse { response }))
}
