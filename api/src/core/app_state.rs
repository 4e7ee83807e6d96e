use std::path::PathBuf;
use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use ai_llm_service::error_handler::env_or;
use grounded_chat::ChatPipeline;
use rag_store::VectorStore;

/// Listener and static asset settings.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Listen address, e.g. `0.0.0.0:8000`.
    pub address: String,
    /// HTML page served at `/`.
    pub index_html_path: PathBuf,
}

impl ApiConfig {
    /// Reads `API_ADDRESS` and `INDEX_HTML_PATH`, with defaults.
    pub fn from_env() -> Self {
        Self {
            address: env_or("API_ADDRESS", "0.0.0.0:8000"),
            index_html_path: PathBuf::from(env_or("INDEX_HTML_PATH", "static/index.html")),
        }
    }
}

/// Shared state for all HTTP handlers. Read-only while serving.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ChatPipeline>,
    /// Same store handle the pipeline's retriever reads from.
    pub store: Arc<dyn VectorStore>,
    /// Provider profiles, probed by `/health`.
    pub llm_profiles: Arc<LlmServiceProfiles>,
    pub index_html_path: PathBuf,
}
