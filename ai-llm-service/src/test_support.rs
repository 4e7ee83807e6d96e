//! Helpers for tests that need a fake OpenAI-compatible server.

use axum::Router;

use crate::config::llm_model_config::LlmModelConfig;

/// Serves `router` on an ephemeral local port and returns its base URL.
pub(crate) async fn spawn_fake(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

pub(crate) fn config_for(base: &str, key: Option<&str>) -> LlmModelConfig {
    LlmModelConfig {
        model: "test-model".into(),
        endpoint: base.into(),
        api_key: key.map(str::to_string),
        max_tokens: Some(400),
        temperature: Some(0.4),
        top_p: None,
        timeout_secs: Some(5),
    }
}
