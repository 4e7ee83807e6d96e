use std::sync::Arc;

use ai_llm_service::{LlmServiceProfiles, telemetry};
use anyhow::{Context, anyhow};
use api::{ApiConfig, AppState};
use grounded_chat::{AnswerGenerator, ChatPipeline, PromptPolicy};
use rag_store::{RagConfig, RagStore, embed::llm_embedder::LlmEmbedder};
use tracing::{Level, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; variables already set in the environment win.
    dotenvy::dotenv().ok();

    telemetry::init("info", Level::INFO).map_err(|e| anyhow!(e))?;

    let llm = Arc::new(LlmServiceProfiles::from_env().context("invalid LLM configuration")?);
    let rag_cfg = RagConfig::from_env().context("invalid vector store configuration")?;
    let policy = Arc::new(PromptPolicy::from_env().context("invalid prompt policy")?);
    let api_cfg = ApiConfig::from_env();

    let embedder = Arc::new(LlmEmbedder::new(llm.clone(), rag_cfg.embedding_dim));
    let rag = RagStore::open(rag_cfg, embedder)
        .await
        .context("failed to open vector store")?;

    match rag.ensure_indexed().await {
        Ok(report) => info!(?report, "knowledge base ready"),
        Err(e) => warn!(error = %e, "ingestion failed; serving with the store as is"),
    }

    let generator = AnswerGenerator::new(llm.clone(), policy);
    let state = Arc::new(AppState {
        pipeline: Arc::new(ChatPipeline::new(rag.retriever(), generator)),
        store: rag.store(),
        llm_profiles: llm,
        index_html_path: api_cfg.index_html_path.clone(),
    });

    api::start(&api_cfg.address, state).await?;
    Ok(())
}
