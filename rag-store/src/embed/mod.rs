//! Embedding abstraction and the zero-vector fallback boundary.

use crate::errors::RagError;
use std::{future::Future, pin::Pin};

use tracing::warn;

pub mod llm_embedder;
pub mod noop_embedder;
pub mod pool;

/// Asynchronous embedding provider.
///
/// Implement this trait to plug in your own embedding backend.
/// Errors are returned as-is; callers that must stay total go through
/// [`embed_or_zero`].
pub trait EmbeddingsProvider: Send + Sync {
    /// Async embedding function.
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, RagError>> + Send + 'a>>;
}

/// Embeds `text`, degrading to `vec![0.0; dim]` on any failure.
///
/// A vector of the wrong size counts as a failure, so every vector handed to
/// the store has exactly `dim` components.
pub async fn embed_or_zero(provider: &dyn EmbeddingsProvider, text: &str, dim: usize) -> Vec<f32> {
    match provider.embed(text).await {
        Ok(v) if v.len() == dim => v,
        Ok(v) => {
            warn!(
                got = v.len(),
                want = dim,
                "embedding has unexpected dimensionality; using zero vector"
            );
            vec![0.0; dim]
        }
        Err(err) => {
            warn!(error = %err, input_len = text.len(), "embedding failed; using zero vector");
            vec![0.0; dim]
        }
    }
}
