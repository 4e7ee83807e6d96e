//! Default LLM configs loaded from environment variables.
//!
//! Two roles are supported, both served by one OpenAI-compatible provider
//! (OpenRouter by default):
//!
//! - **Chat**      → grounded answer generation
//! - **Embedding** → query/chunk embeddings
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_BASE_URL` = API base (default `https://openrouter.ai/api/v1`)
//! - `LLM_API_KEY` or `OPENROUTER_API_KEY` = bearer credential (optional)
//!
//! Chat:
//! - `CHAT_MODEL`        (default `deepseek/deepseek-chat`)
//! - `LLM_TEMPERATURE`   (default `0.4`, range `0.0..=2.0`)
//! - `LLM_MAX_TOKENS`    (default `400`)
//! - `LLM_TIMEOUT_SECS`  (default `60`)
//!
//! Embedding:
//! - `EMBEDDING_MODEL`        (default `openai/text-embedding-3-small`)
//! - `EMBEDDING_TIMEOUT_SECS` (default `30`)

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{
        AiLlmError, ConfigError, env_opt, env_opt_f32, env_opt_u32, env_opt_u64, env_or,
        validate_http_endpoint, validate_range_f32,
    },
};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_CHAT_MODEL: &str = "deepseek/deepseek-chat";
pub const DEFAULT_EMBEDDING_MODEL: &str = "openai/text-embedding-3-small";
pub const DEFAULT_TEMPERATURE: f32 = 0.4;
pub const DEFAULT_MAX_TOKENS: u32 = 400;

/// Resolves the provider base URL and validates its scheme.
fn base_url() -> Result<String, AiLlmError> {
    let url = env_or("LLM_BASE_URL", DEFAULT_BASE_URL);
    validate_http_endpoint("LLM_BASE_URL", &url)?;
    Ok(url.trim().trim_end_matches('/').to_string())
}

/// Resolves the bearer credential.
///
/// Precedence: `LLM_API_KEY`, then `OPENROUTER_API_KEY`. A missing key is not
/// a configuration error: the service starts and every call degrades to its
/// fallback.
fn api_key() -> Option<String> {
    env_opt("LLM_API_KEY").or_else(|| env_opt("OPENROUTER_API_KEY"))
}

fn model(var: &'static str, default: &str) -> Result<String, AiLlmError> {
    let m = env_or(var, default);
    if m.trim().is_empty() {
        return Err(ConfigError::EmptyModel.into());
    }
    Ok(m.trim().to_string())
}

/// Constructs the **chat** profile used for grounded answers.
///
/// # Defaults
/// - `temperature = 0.4`
/// - `max_tokens = 400`
/// - `timeout_secs = 60`
pub fn config_chat() -> Result<LlmModelConfig, AiLlmError> {
    let temperature = env_opt_f32("LLM_TEMPERATURE")?.unwrap_or(DEFAULT_TEMPERATURE);
    validate_range_f32("temperature", temperature, 0.0, 2.0)?;

    Ok(LlmModelConfig {
        model: model("CHAT_MODEL", DEFAULT_CHAT_MODEL)?,
        endpoint: base_url()?,
        api_key: api_key(),
        max_tokens: Some(env_opt_u32("LLM_MAX_TOKENS")?.unwrap_or(DEFAULT_MAX_TOKENS)),
        temperature: Some(temperature),
        top_p: None,
        timeout_secs: Some(env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(60)),
    })
}

/// Constructs the **embedding** profile.
///
/// # Defaults
/// - `timeout_secs = 30`
/// - no sampling parameters
pub fn config_embedding() -> Result<LlmModelConfig, AiLlmError> {
    Ok(LlmModelConfig {
        model: model("EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL)?,
        endpoint: base_url()?,
        api_key: api_key(),
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: Some(env_opt_u64("EMBEDDING_TIMEOUT_SECS")?.unwrap_or(30)),
    })
}
