//! One-time ingestion: corpus file → chunks → embeddings → store.
//!
//! Runs only when the store is empty. Embedding failures never abort
//! ingestion; the affected chunk is stored with a zero vector.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::chunker::chunk_corpus;
use crate::config::RagConfig;
use crate::embed::EmbeddingsProvider;
use crate::embed::pool::embed_all;
use crate::errors::RagError;
use crate::record::StoredChunk;
use crate::store::VectorStore;

/// Outcome of [`Indexer::ensure_indexed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestReport {
    /// The store already held chunks; nothing was written.
    AlreadyPopulated { count: u64 },
    /// The corpus file does not exist; the store stays empty.
    CorpusMissing { path: PathBuf },
    /// The corpus was chunked and written.
    Ingested { chunks: u64 },
}

/// Populates the store from a corpus file.
pub struct Indexer {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingsProvider>,
    dim: usize,
    concurrency: usize,
    batch: usize,
}

impl Indexer {
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn EmbeddingsProvider>,
        cfg: &RagConfig,
    ) -> Self {
        Self {
            store,
            embedder,
            dim: cfg.embedding_dim,
            concurrency: cfg.embedding_concurrency.max(1),
            batch: cfg.upsert_batch.max(1),
        }
    }

    /// Ingests `corpus_path` unless the store already holds chunks.
    ///
    /// # Errors
    /// Returns store errors (count/add) and I/O errors other than "not found".
    pub async fn ensure_indexed(&self, corpus_path: &Path) -> Result<IngestReport, RagError> {
        let count = self.store.count().await?;
        if count > 0 {
            info!(count, "store already populated; skipping ingestion");
            return Ok(IngestReport::AlreadyPopulated { count });
        }

        let text = match tokio::fs::read_to_string(corpus_path).await {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %corpus_path.display(), "corpus file not found; skipping ingestion");
                return Ok(IngestReport::CorpusMissing {
                    path: corpus_path.to_path_buf(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let chunks = self.ingest_text(&text).await?;
        info!(path = %corpus_path.display(), chunks, "ingestion complete");
        Ok(IngestReport::Ingested { chunks })
    }

    /// Chunks, embeds and writes `text`. Returns the number of chunks written.
    pub async fn ingest_text(&self, text: &str) -> Result<u64, RagError> {
        let chunks = chunk_corpus(text);
        if chunks.is_empty() {
            debug!("corpus produced no chunks");
            return Ok(0);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = embed_all(&texts, self.embedder.as_ref(), self.dim, self.concurrency).await;

        let records: Vec<StoredChunk> = chunks
            .into_iter()
            .zip(vectors)
            .map(|(c, embedding)| StoredChunk {
                id: c.id,
                text: c.text,
                embedding,
            })
            .collect();

        let batches = records.len().div_ceil(self.batch);
        let pb = ProgressBar::new(batches as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
        ) {
            pb.set_style(style.progress_chars("##-"));
        }

        let mut total: u64 = 0;
        for batch in records.chunks(self.batch) {
            total += self.store.add(batch.to_vec()).await?;
            pb.inc(1);
        }
        pb.finish_and_clear();

        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::noop_embedder::NoopEmbedder;
    use crate::store::local::LocalStore;
    use crate::test_support::{BrokenStore, CountingStore, KeywordEmbedder};
    use tempfile::tempdir;

    fn cfg(dim: usize, batch: usize) -> RagConfig {
        let mut cfg = RagConfig::new_default("./unused", "company");
        cfg.embedding_dim = dim;
        cfg.upsert_batch = batch;
        cfg
    }

    #[tokio::test]
    async fn ingests_once_and_skips_afterwards() {
        let dir = tempdir().unwrap();
        let corpus = dir.path().join("data.txt");
        std::fs::write(&corpus, "Founded in 2020.\n\nHQ in Pune.\n\n\nWe build tools.").unwrap();

        let store = Arc::new(CountingStore::default());
        let embedder = Arc::new(KeywordEmbedder::new(&["founded", "pune"]));
        let indexer = Indexer::new(store.clone(), embedder.clone(), &cfg(2, 2));

        let first = indexer.ensure_indexed(&corpus).await.unwrap();
        assert_eq!(first, IngestReport::Ingested { chunks: 3 });
        assert_eq!(store.ids(), ["0", "1", "2"]);
        assert_eq!(store.adds(), 2);
        assert_eq!(embedder.calls(), 3);

        let second = indexer.ensure_indexed(&corpus).await.unwrap();
        assert_eq!(second, IngestReport::AlreadyPopulated { count: 3 });
        assert_eq!(store.adds(), 2);
        assert_eq!(embedder.calls(), 3);
    }

    #[tokio::test]
    async fn missing_corpus_is_reported_not_fatal() {
        let store = Arc::new(CountingStore::default());
        let indexer = Indexer::new(store.clone(), Arc::new(NoopEmbedder), &cfg(2, 8));

        let report = indexer
            .ensure_indexed(Path::new("/definitely/not/here.txt"))
            .await
            .unwrap();
        assert!(matches!(report, IngestReport::CorpusMissing { .. }));
        assert_eq!(store.adds(), 0);
    }

    #[tokio::test]
    async fn failing_embedder_stores_zero_vectors() {
        let dir = tempdir().unwrap();
        let store = Arc::new(
            LocalStore::open(dir.path(), "company", cfg(4, 8).vector_space())
                .await
                .unwrap(),
        );
        let indexer = Indexer::new(store.clone(), Arc::new(NoopEmbedder), &cfg(4, 8));

        assert_eq!(indexer.ingest_text("one\n\ntwo").await.unwrap(), 2);
        assert_eq!(store.count().await.unwrap(), 2);

        let hits = store.query(&[0.0; 4], 4).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].text, "one");
    }

    #[tokio::test]
    async fn store_errors_propagate() {
        let indexer = Indexer::new(Arc::new(BrokenStore), Arc::new(NoopEmbedder), &cfg(2, 8));
        assert!(indexer.ensure_indexed(Path::new("data.txt")).await.is_err());
    }
}
