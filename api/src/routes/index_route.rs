//! GET / — the static chat page.

use std::sync::Arc;

use axum::{extract::State, response::Html};
use tracing::warn;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
};

pub async fn index_page(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    match tokio::fs::read_to_string(&state.index_html_path).await {
        Ok(html) => Ok(Html(html)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %state.index_html_path.display(), "index page missing");
            Err(AppError::NotFound(
                state.index_html_path.display().to_string(),
            ))
        }
        Err(e) => Err(e.into()),
    }
}
