//! Health service for OpenAI-compatible backends.
//!
//! Probe: `GET {endpoint}/models` (Bearer auth when a key is configured),
//! followed by a best-effort check that the configured model is listed.
//!
//! The returned [`HealthStatus`] is JSON-serializable and suitable for a `/health` endpoint.
//! [`HealthService::check`] is resilient and never fails (errors mapped to `ok=false`).
//! The provider probe (`try_probe`) returns a strict `Result`.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::llm_model_config::LlmModelConfig;
use crate::error_handler::{AiLlmError, HealthError, HttpError, make_snippet};

/// A serializable health snapshot for a single profile.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Logical profile name (e.g., "chat", "embedding").
    pub profile: String,
    /// Target endpoint base URL.
    pub endpoint: String,
    /// Model identifier relevant to the probe.
    pub model: String,
    /// Overall health flag.
    pub ok: bool,
    /// Whether the model id appeared in the `/models` listing.
    pub model_listed: bool,
    /// Whether a credential is configured for this profile.
    pub has_api_key: bool,
    /// Measured HTTP latency in milliseconds for the main probe.
    pub latency_ms: u128,
    /// Short human-readable message with details.
    pub message: String,
}

impl HealthStatus {
    fn new(
        profile: &str,
        cfg: &LlmModelConfig,
        ok: bool,
        latency_ms: u128,
        message: impl Into<String>,
    ) -> Self {
        Self {
            profile: profile.to_string(),
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            ok,
            model_listed: false,
            has_api_key: cfg.has_api_key(),
            latency_ms,
            message: message.into(),
        }
    }
}

/// A health checker that reuses a single HTTP client.
///
/// The client is constructed with a default timeout. Individual probes may
/// override the timeout per request based on the provided config.
pub struct HealthService {
    client: reqwest::Client,
    default_timeout: Duration,
}

impl HealthService {
    /// Creates a new health service with an optional client timeout (seconds).
    ///
    /// # Errors
    /// Returns [`AiLlmError::HttpTransport`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, AiLlmError> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        info!(
            default_timeout_secs = timeout.as_secs(),
            "HealthService initialized"
        );

        Ok(Self {
            client,
            default_timeout: timeout,
        })
    }

    /// Checks health for a single profile.
    ///
    /// This method is **resilient**: it never returns an error. Any failure is converted
    /// to `HealthStatus { ok: false, message: ... }`.
    pub async fn check(&self, profile: &str, cfg: &LlmModelConfig) -> HealthStatus {
        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            warn!(
                profile,
                endpoint = %cfg.endpoint,
                "invalid endpoint (empty or missing http/https)"
            );
            return HealthStatus::new(
                profile,
                cfg,
                false,
                0,
                "endpoint is empty or missing http/https",
            );
        }

        let start = Instant::now();
        match self.try_probe(profile, cfg).await {
            Ok(status) => {
                info!(
                    profile,
                    endpoint = %status.endpoint,
                    model = %status.model,
                    ok = status.ok,
                    model_listed = status.model_listed,
                    latency_ms = status.latency_ms,
                    "health probe completed"
                );
                status
            }
            Err(err) => {
                let status = HealthStatus::new(
                    profile,
                    cfg,
                    false,
                    start.elapsed().as_millis(),
                    err.to_string(),
                );
                warn!(
                    profile,
                    endpoint = %status.endpoint,
                    model = %status.model,
                    latency_ms = status.latency_ms,
                    message = %status.message,
                    "health probe failed"
                );
                status
            }
        }
    }

    /// Checks health for multiple `(profile, config)` pairs, sequentially.
    pub async fn check_many(&self, configs: &[(&str, &LlmModelConfig)]) -> Vec<HealthStatus> {
        debug!(count = configs.len(), "running batch health probes");
        let mut out = Vec::with_capacity(configs.len());
        for (profile, cfg) in configs {
            out.push(self.check(profile, cfg).await);
        }
        out
    }

    /// Strict probe. Returns an error on hard failures.
    ///
    /// - `GET {endpoint}/models`
    /// - Ensure 2xx
    /// - Best-effort: verify `cfg.model` exists in the returned list
    async fn try_probe(
        &self,
        profile: &str,
        cfg: &LlmModelConfig,
    ) -> Result<HealthStatus, AiLlmError> {
        let url = format!("{}/models", cfg.endpoint.trim().trim_end_matches('/'));
        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(self.default_timeout);

        let start = Instant::now();
        debug!(profile, model = %cfg.model, "GET {}", url);

        let mut req = self.client.get(&url).timeout(timeout);
        if let Some(key) = cfg.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            req = req.bearer_auth(key);
        }
        let resp = req
            .send()
            .await
            .map_err(|e| AiLlmError::from_transport(e, timeout))?;

        let latency = start.elapsed().as_millis();

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                profile,
                %url,
                %status,
                %snippet,
                latency_ms = latency,
                "health GET /models returned non-success status"
            );

            return Err(HealthError::HttpStatus(HttpError {
                status,
                url,
                snippet,
            })
            .into());
        }

        // Expected minimal JSON: { "data": [ { "id": "<model>" }, ... ] }
        #[derive(Deserialize)]
        struct ModelItem {
            id: String,
        }
        #[derive(Deserialize)]
        struct Models {
            #[serde(default)]
            data: Vec<ModelItem>,
        }

        match resp.json::<Models>().await {
            Ok(models) => {
                let listed = models.data.iter().any(|m| m.id == cfg.model);
                let message = if listed {
                    "provider is healthy; model is available"
                } else {
                    "provider is up; model not listed in /models"
                };
                let mut status = HealthStatus::new(profile, cfg, true, latency, message);
                status.model_listed = listed;
                Ok(status)
            }
            Err(e) => {
                warn!(
                    profile,
                    model = %cfg.model,
                    error = %e,
                    latency_ms = latency,
                    "failed to decode /models; treating server as reachable"
                );
                Ok(HealthStatus::new(
                    profile,
                    cfg,
                    true,
                    latency,
                    format!("provider is reachable; failed to decode /models: {e}"),
                ))
            }
        }
    }
}
