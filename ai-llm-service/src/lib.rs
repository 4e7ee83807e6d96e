//! OpenAI-compatible LLM access shared by the workspace.
//!
//! - [`service_profiles::LlmServiceProfiles`]: chat + embedding profiles behind one handle
//! - [`services::open_ai_service::OpenAiService`]: the HTTP client
//! - [`health_service::HealthService`]: `/models` probes for `/health`
//! - [`telemetry`]: tracing subscriber setup for the binary

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

#[cfg(test)]
mod test_support;

pub use config::llm_model_config::LlmModelConfig;
pub use error_handler::{AiLlmError, ProviderErrorKind};
pub use service_profiles::LlmServiceProfiles;
