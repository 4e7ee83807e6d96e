//! Knowledge store for grounded chat: chunking, ingestion and top-k retrieval.
//!
//! This crate provides a clean API to:
//! - Split a plain-text corpus into blank-line separated chunks
//! - Embed and ingest them once into a vector store (local file or Qdrant)
//! - Retrieve the k most similar chunks for a question
//!
//! Embedding failures never surface past [`embed::embed_or_zero`]; the
//! affected text is represented by a zero vector.

pub mod chunker;
pub mod config;
pub mod embed;
pub mod errors;
pub mod indexer;
pub mod record;
pub mod retriever;
pub mod store;

#[cfg(test)]
mod test_support;

pub use config::{DistanceKind, RagConfig, StoreBackend, VectorSpace};
pub use embed::{EmbeddingsProvider, embed_or_zero};
pub use errors::RagError;
pub use indexer::{IngestReport, Indexer};
pub use record::{Chunk, RagHit, StoredChunk};
pub use retriever::Retriever;
pub use store::{VectorStore, open_store};

use std::sync::Arc;

use tracing::debug;

/// High-level facade that wires the store, the indexer and the retriever.
///
/// This is the single entry point recommended for application code.
pub struct RagStore {
    cfg: RagConfig,
    store: Arc<dyn VectorStore>,
    indexer: Indexer,
    retriever: Arc<Retriever>,
}

impl RagStore {
    /// Opens the configured backend and builds indexer + retriever over it.
    ///
    /// # Errors
    /// Returns config, I/O or client errors from [`open_store`].
    pub async fn open(
        cfg: RagConfig,
        embedder: Arc<dyn EmbeddingsProvider>,
    ) -> Result<Self, RagError> {
        let store = open_store(&cfg).await?;
        Ok(Self::with_store(cfg, store, embedder))
    }

    /// Same as [`Self::open`] with an already constructed store.
    pub fn with_store(
        cfg: RagConfig,
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn EmbeddingsProvider>,
    ) -> Self {
        let indexer = Indexer::new(store.clone(), embedder.clone(), &cfg);
        let retriever = Arc::new(Retriever::new(
            store.clone(),
            embedder,
            cfg.embedding_dim,
            cfg.top_k,
        ));
        Self {
            cfg,
            store,
            indexer,
            retriever,
        }
    }

    /// Ingests the configured corpus unless the store is already populated.
    ///
    /// # Errors
    /// Returns store or I/O errors; a missing corpus is a report, not an error.
    pub async fn ensure_indexed(&self) -> Result<IngestReport, RagError> {
        debug!(path = %self.cfg.corpus_path.display(), "RagStore::ensure_indexed");
        self.indexer.ensure_indexed(&self.cfg.corpus_path).await
    }

    /// Shared retriever handle.
    pub fn retriever(&self) -> Arc<Retriever> {
        self.retriever.clone()
    }

    /// Shared store handle.
    pub fn store(&self) -> Arc<dyn VectorStore> {
        self.store.clone()
    }

    pub fn config(&self) -> &RagConfig {
        &self.cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::KeywordEmbedder;
    use tempfile::tempdir;

    #[tokio::test]
    async fn facade_ingests_configured_corpus_and_retrieves() {
        let dir = tempdir().unwrap();
        let corpus = dir.path().join("data.txt");
        std::fs::write(&corpus, "Founded in 2020.\n\nOffice in Pune.").unwrap();

        let mut cfg = RagConfig::new_default(dir.path().join("store"), "company");
        cfg.embedding_dim = 2;
        cfg.corpus_path = corpus;

        let rag = RagStore::open(cfg, Arc::new(KeywordEmbedder::new(&["founded", "office"])))
            .await
            .unwrap();

        assert_eq!(
            rag.ensure_indexed().await.unwrap(),
            IngestReport::Ingested { chunks: 2 }
        );
        assert_eq!(rag.store().count().await.unwrap(), 2);

        let hits = rag.retriever().retrieve("where is the office").await;
        assert_eq!(hits[0].text, "Office in Pune.");
        assert!(dir.path().join("store").join("company.json").exists());
    }
}
