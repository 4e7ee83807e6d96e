//! Embedding executor with bounded concurrency and stable ordering.

use crate::embed::{EmbeddingsProvider, embed_or_zero};
use futures::stream::{self, StreamExt};
use tracing::{debug, info};

/// Embeds every text, returning vectors in input order.
///
/// # Arguments
/// - `texts`: chunk texts, in corpus order.
/// - `provider`: embedding backend.
/// - `dim`: expected vector size; failures and mismatches become zero vectors.
/// - `concurrency`: maximum number of in-flight embedding calls (`1` = sequential).
///
/// Never fails: each text goes through [`embed_or_zero`].
pub async fn embed_all(
    texts: &[String],
    provider: &dyn EmbeddingsProvider,
    dim: usize,
    concurrency: usize,
) -> Vec<Vec<f32>> {
    info!(total = texts.len(), concurrency, "embedding chunks");

    if texts.is_empty() {
        debug!("embed_all: nothing to embed");
        return Vec::new();
    }

    let vectors: Vec<Vec<f32>> = stream::iter(texts.iter())
        .map(|text| embed_or_zero(provider, text, dim))
        .buffered(concurrency.max(1))
        .collect()
        .await;

    debug!(count = vectors.len(), "embed_all: embeddings filled");
    vectors
}
