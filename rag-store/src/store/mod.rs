//! Vector store seam: the collection that owns persisted chunks.
//!
//! Two backends implement [`VectorStore`]:
//! - [`local::LocalStore`]: one JSON file per collection under a directory, exact scan
//! - [`qdrant_facade::QdrantFacade`]: a Qdrant collection
//!
//! The handle is opened once at startup via [`open_store`] and shared as
//! `Arc<dyn VectorStore>`.

use std::{future::Future, pin::Pin, sync::Arc};

use tracing::info;

use crate::config::{RagConfig, StoreBackend};
use crate::errors::RagError;
use crate::record::{RagHit, StoredChunk};

pub mod local;
pub mod qdrant_facade;

/// Boxed future returned by [`VectorStore`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RagError>> + Send + 'a>>;

/// Persistent chunk collection with k-nearest-neighbor lookup.
pub trait VectorStore: Send + Sync {
    /// Number of chunks currently stored.
    fn count(&self) -> StoreFuture<'_, u64>;

    /// Upserts chunks by id. Returns how many were written.
    ///
    /// Every embedding must match the collection's dimensionality.
    fn add(&self, chunks: Vec<StoredChunk>) -> StoreFuture<'_, u64>;

    /// Returns up to `n_results` chunks, most similar first.
    fn query<'a>(&'a self, vector: &'a [f32], n_results: u64) -> StoreFuture<'a, Vec<RagHit>>;
}

/// Opens the backend selected by `cfg.backend`.
///
/// # Errors
/// Returns config, I/O, parse or Qdrant client errors.
pub async fn open_store(cfg: &RagConfig) -> Result<Arc<dyn VectorStore>, RagError> {
    cfg.validate()?;
    info!(backend = ?cfg.backend, collection = %cfg.collection, "opening vector store");
    match cfg.backend {
        StoreBackend::Local => {
            let store =
                local::LocalStore::open(&cfg.persist_dir, &cfg.collection, cfg.vector_space())
                    .await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Qdrant => Ok(Arc::new(qdrant_facade::QdrantFacade::new(cfg)?)),
    }
}
