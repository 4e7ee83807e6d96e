/// Configuration for an LLM model invocation against an OpenAI-compatible API.
///
/// # Fields
///
/// - `model`: The model identifier (e.g., `"deepseek/deepseek-chat"`).
/// - `endpoint`: API base including the version segment
///   (e.g., `"https://openrouter.ai/api/v1"`).
/// - `api_key`: Bearer credential. `None` is allowed: calls then fail fast
///   with `MissingApiKey` without touching the network.
/// - `max_tokens`: Maximum number of tokens to generate (chat only).
/// - `temperature`: Controls randomness (chat only).
/// - `top_p`: Nucleus sampling cutoff (chat only).
/// - `timeout_secs`: Optional request timeout in seconds.
///
/// # Examples
///
/// ```
/// use ai_llm_service::config::llm_model_config::LlmModelConfig;
///
/// let cfg = LlmModelConfig {
///     model: "deepseek/deepseek-chat".to_string(),
///     endpoint: "https://openrouter.ai/api/v1".to_string(),
///     api_key: Some("sk-...".to_string()),
///     max_tokens: Some(400),
///     temperature: Some(0.4),
///     top_p: None,
///     timeout_secs: Some(60),
/// };
/// assert!(cfg.has_api_key());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// Model identifier string.
    pub model: String,

    /// API base URL (scheme + host + version prefix).
    pub endpoint: String,

    /// Optional API key for authentication.
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// `true` if a non-empty API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}
