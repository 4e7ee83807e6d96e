//! Embedding provider backed by the shared LLM service.
//!
//! Calls the embedding profile of [`LlmServiceProfiles`] and checks the
//! returned dimensionality.

use std::sync::Arc;

use crate::{EmbeddingsProvider, RagError};
use ai_llm_service::service_profiles::LlmServiceProfiles;

/// Remote embedding provider (async).
#[derive(Clone)]
pub struct LlmEmbedder {
    svc: Arc<LlmServiceProfiles>,
    dim: usize,
}

impl LlmEmbedder {
    /// `dim` is the expected embedding size; other sizes are errors.
    pub fn new(svc: Arc<LlmServiceProfiles>, dim: usize) -> Self {
        Self { svc, dim }
    }
}

impl EmbeddingsProvider for LlmEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Vec<f32>, RagError>> + Send + 'a>>
    {
        Box::pin(async move {
            let resp = self.svc.embed(text).await?;

            if resp.len() != self.dim {
                return Err(RagError::VectorSizeMismatch {
                    got: resp.len(),
                    want: self.dim,
                });
            }

            Ok(resp)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::embed_or_zero;
    use ai_llm_service::LlmModelConfig;

    fn keyless(model: &str) -> LlmModelConfig {
        LlmModelConfig {
            model: model.into(),
            endpoint: "http://127.0.0.1:9".into(),
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(1),
        }
    }

    #[tokio::test]
    async fn missing_credentials_degrade_to_zero_vector() {
        let svc = Arc::new(LlmServiceProfiles::new(keyless("chat"), keyless("emb"), Some(1)).unwrap());
        let embedder = LlmEmbedder::new(svc, 8);

        assert!(matches!(
            embedder.embed("hello").await,
            Err(RagError::Embedding(_))
        ));
        assert_eq!(embed_or_zero(&embedder, "hello", 8).await, vec![0.0; 8]);
    }
}
