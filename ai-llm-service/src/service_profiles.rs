//! Shared LLM service with two active profiles: `chat` and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Builds one HTTP client per profile up front; clients are reused for every call.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::service_profiles::LlmServiceProfiles;
//!
//! # async fn run() -> Result<(), ai_llm_service::error_handler::AiLlmError> {
//! let svc = Arc::new(LlmServiceProfiles::from_env()?);
//!
//! let txt = svc.generate("When was the company founded?", Some("Answer briefly.")).await?;
//! println!("CHAT: {txt}");
//!
//! let emb = svc.embed("Ferris").await?;
//! println!("Embedding dim = {}", emb.len());
//!
//! let statuses = svc.health_all().await;
//! println!("Health = {statuses:?}");
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tracing::warn;

use crate::{
    config::{
        default_config::{config_chat, config_embedding},
        llm_model_config::LlmModelConfig,
    },
    error_handler::AiLlmError,
    health_service::{HealthService, HealthStatus},
    services::open_ai_service::OpenAiService,
};

/// Shared service that manages the **chat** and **embedding** profiles.
pub struct LlmServiceProfiles {
    chat: Arc<OpenAiService>,
    embedding: Arc<OpenAiService>,
    health: HealthService,
}

impl LlmServiceProfiles {
    /// Creates a new service with both profiles.
    ///
    /// - `chat`: profile for answer generation.
    /// - `embedding`: profile for embeddings.
    /// - `health_timeout_secs`: optional timeout for the health checker.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if an endpoint is invalid or a client cannot be built.
    pub fn new(
        chat: LlmModelConfig,
        embedding: LlmModelConfig,
        health_timeout_secs: Option<u64>,
    ) -> Result<Self, AiLlmError> {
        if !chat.has_api_key() || !embedding.has_api_key() {
            warn!(
                chat_key = chat.has_api_key(),
                embedding_key = embedding.has_api_key(),
                "LLM credential missing; affected calls will degrade to fallbacks"
            );
        }

        Ok(Self {
            chat: Arc::new(OpenAiService::new(chat)?),
            embedding: Arc::new(OpenAiService::new(embedding)?),
            health: HealthService::new(health_timeout_secs)?,
        })
    }

    /// Builds both profiles from environment variables
    /// (see [`crate::config::default_config`]).
    pub fn from_env() -> Result<Self, AiLlmError> {
        Self::new(config_chat()?, config_embedding()?, Some(10))
    }

    /// Generates text using the **chat** profile.
    ///
    /// # Arguments
    /// - `prompt`: user message.
    /// - `system`: optional system instruction.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if generation fails.
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, AiLlmError> {
        self.chat.generate(prompt, system).await
    }

    /// Computes embeddings using the **embedding** profile.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if embedding fails.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        self.embedding.embeddings(input).await
    }

    /// Returns a health snapshot for both profiles.
    ///
    /// If both profiles share an endpoint, the endpoint is still probed once
    /// per profile so each model's listing is reported.
    pub async fn health_all(&self) -> Vec<HealthStatus> {
        self.health
            .check_many(&[
                ("chat", self.chat.config()),
                ("embedding", self.embedding.config()),
            ])
            .await
    }

    /// Returns references to the current profiles `(chat, embedding)`.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig) {
        (self.chat.config(), self.embedding.config())
    }
}
