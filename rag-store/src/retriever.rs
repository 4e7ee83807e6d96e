//! Query-time retrieval: embed the question, ask the store for the k nearest chunks.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::embed::{EmbeddingsProvider, embed_or_zero};
use crate::errors::RagError;
use crate::record::RagHit;
use crate::store::VectorStore;

/// Top-k retriever over a shared store.
pub struct Retriever {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingsProvider>,
    dim: usize,
    top_k: u64,
}

impl Retriever {
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn EmbeddingsProvider>,
        dim: usize,
        top_k: u64,
    ) -> Self {
        Self {
            store,
            embedder,
            dim,
            top_k,
        }
    }

    /// Configured k.
    pub fn top_k(&self) -> u64 {
        self.top_k
    }

    /// Strict variant: store errors are returned to the caller.
    ///
    /// The question embedding itself never fails (zero-vector fallback).
    pub async fn try_retrieve_k(&self, question: &str, k: u64) -> Result<Vec<RagHit>, RagError> {
        let vector = embed_or_zero(self.embedder.as_ref(), question, self.dim).await;
        let hits = self.store.query(&vector, k).await?;
        debug!(k, hits = hits.len(), "retrieval finished");
        Ok(hits)
    }

    /// Up to `k` hits, most similar first. Store failures yield an empty result.
    pub async fn retrieve_k(&self, question: &str, k: u64) -> Vec<RagHit> {
        match self.try_retrieve_k(question, k).await {
            Ok(hits) => hits,
            Err(err) => {
                warn!(error = %err, k, "vector store query failed; continuing without context");
                Vec::new()
            }
        }
    }

    /// [`Self::retrieve_k`] with the configured k.
    pub async fn retrieve(&self, question: &str) -> Vec<RagHit> {
        self.retrieve_k(question, self.top_k).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DistanceKind, VectorSpace};
    use crate::embed::noop_embedder::NoopEmbedder;
    use crate::record::StoredChunk;
    use crate::store::local::LocalStore;
    use crate::test_support::{BrokenStore, KeywordEmbedder};
    use tempfile::tempdir;

    const KEYWORDS: [&str; 3] = ["founded", "office", "product"];

    async fn seeded(dir: &std::path::Path) -> Arc<LocalStore> {
        let store = LocalStore::open(
            dir,
            "company",
            VectorSpace {
                size: 3,
                distance: DistanceKind::Cosine,
            },
        )
        .await
        .unwrap();
        let kw = KeywordEmbedder::new(&KEYWORDS);
        let mut chunks = Vec::new();
        for (i, text) in [
            "The company was founded in 2020.",
            "Our office is in Pune.",
            "The main product is a grant tracker.",
        ]
        .iter()
        .enumerate()
        {
            chunks.push(StoredChunk {
                id: i.to_string(),
                text: text.to_string(),
                embedding: kw.embed(text).await.unwrap(),
            });
        }
        store.add(chunks).await.unwrap();
        Arc::new(store)
    }

    #[tokio::test]
    async fn most_similar_chunk_comes_first() {
        let dir = tempdir().unwrap();
        let r = Retriever::new(
            seeded(dir.path()).await,
            Arc::new(KeywordEmbedder::new(&KEYWORDS)),
            3,
            4,
        );
        let hits = r.retrieve("When was the company founded?").await;
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].id, "0");
        assert!(hits[0].text.contains("2020"));
    }

    #[tokio::test]
    async fn k_larger_than_store_returns_everything() {
        let dir = tempdir().unwrap();
        let r = Retriever::new(seeded(dir.path()).await, Arc::new(NoopEmbedder), 3, 4);
        assert_eq!(r.retrieve_k("anything", 10).await.len(), 3);
        assert_eq!(r.retrieve_k("anything", 1).await.len(), 1);
    }

    #[tokio::test]
    async fn empty_store_gives_empty_result() {
        let dir = tempdir().unwrap();
        let store = LocalStore::open(
            dir.path(),
            "empty",
            VectorSpace {
                size: 3,
                distance: DistanceKind::Cosine,
            },
        )
        .await
        .unwrap();
        let r = Retriever::new(Arc::new(store), Arc::new(NoopEmbedder), 3, 4);
        assert!(r.retrieve("hello").await.is_empty());
    }

    #[tokio::test]
    async fn store_failure_is_absorbed_at_retrieve() {
        let r = Retriever::new(Arc::new(BrokenStore), Arc::new(NoopEmbedder), 3, 4);
        assert!(r.try_retrieve_k("q", 4).await.is_err());
        assert!(r.retrieve("q").await.is_empty());
    }
}
