//! File-backed collection: one JSON snapshot per collection, exact scan on query.
//!
//! Layout: `{persist_dir}/{collection}.json`. The whole snapshot is rewritten on
//! every `add` through a temp file + rename, so a crash never leaves a torn file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::{DistanceKind, VectorSpace};
use crate::errors::RagError;
use crate::record::{RagHit, StoredChunk};
use crate::store::{StoreFuture, VectorStore};

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    dimension: usize,
    chunks: Vec<StoredChunk>,
}

/// Local persistent collection.
pub struct LocalStore {
    path: PathBuf,
    space: VectorSpace,
    chunks: RwLock<Vec<StoredChunk>>,
}

impl LocalStore {
    /// Opens (or lazily creates) the collection under `dir`.
    ///
    /// Nothing is written until the first `add`.
    ///
    /// # Errors
    /// - `Io`/`Parse` when an existing snapshot cannot be read
    /// - `VectorSizeMismatch` when the snapshot was built with another dimension
    pub async fn open(
        dir: impl AsRef<Path>,
        collection: &str,
        space: VectorSpace,
    ) -> Result<Self, RagError> {
        let path = dir.as_ref().join(format!("{collection}.json"));

        let chunks = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let snap: Snapshot = serde_json::from_slice(&bytes)?;
                if !snap.chunks.is_empty() && snap.dimension != space.size {
                    return Err(RagError::VectorSizeMismatch {
                        got: snap.dimension,
                        want: space.size,
                    });
                }
                snap.chunks
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        info!(path = %path.display(), chunks = chunks.len(), "local collection opened");
        Ok(Self {
            path,
            space,
            chunks: RwLock::new(chunks),
        })
    }

    /// Location of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn upsert(&self, incoming: Vec<StoredChunk>) -> Result<u64, RagError> {
        if incoming.is_empty() {
            return Ok(0);
        }
        if let Some(bad) = incoming
            .iter()
            .find(|c| c.embedding.len() != self.space.size)
        {
            return Err(RagError::VectorSizeMismatch {
                got: bad.embedding.len(),
                want: self.space.size,
            });
        }

        let n = incoming.len() as u64;
        let mut guard = self.chunks.write().await;
        let mut next = guard.clone();
        for chunk in incoming {
            match next.iter_mut().find(|c| c.id == chunk.id) {
                Some(slot) => *slot = chunk,
                None => next.push(chunk),
            }
        }

        self.persist(&next).await?;
        *guard = next;
        debug!(path = %self.path.display(), written = n, total = guard.len(), "snapshot saved");
        Ok(n)
    }

    async fn persist(&self, chunks: &[StoredChunk]) -> Result<(), RagError> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        let snap = Snapshot {
            version: SNAPSHOT_VERSION,
            dimension: self.space.size,
            chunks: chunks.to_vec(),
        };
        let bytes = serde_json::to_vec(&snap)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn search(&self, vector: &[f32], n_results: u64) -> Result<Vec<RagHit>, RagError> {
        if vector.len() != self.space.size {
            return Err(RagError::VectorSizeMismatch {
                got: vector.len(),
                want: self.space.size,
            });
        }
        if n_results == 0 {
            return Ok(Vec::new());
        }

        let guard = self.chunks.read().await;
        let mut hits: Vec<RagHit> = guard
            .iter()
            .map(|c| RagHit {
                id: c.id.clone(),
                score: score(self.space.distance, vector, &c.embedding),
                text: c.text.clone(),
            })
            .collect();

        // Stable sort: ties keep insertion (corpus) order.
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(usize::try_from(n_results).unwrap_or(usize::MAX));
        Ok(hits)
    }
}

impl VectorStore for LocalStore {
    fn count(&self) -> StoreFuture<'_, u64> {
        Box::pin(async move { Ok(self.chunks.read().await.len() as u64) })
    }

    fn add(&self, chunks: Vec<StoredChunk>) -> StoreFuture<'_, u64> {
        Box::pin(self.upsert(chunks))
    }

    fn query<'a>(&'a self, vector: &'a [f32], n_results: u64) -> StoreFuture<'a, Vec<RagHit>> {
        Box::pin(self.search(vector, n_results))
    }
}

/// Higher is more similar for every distance kind.
fn score(kind: DistanceKind, a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    match kind {
        DistanceKind::Dot => dot,
        DistanceKind::Cosine => {
            let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
            let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
            if na == 0.0 || nb == 0.0 {
                0.0
            } else {
                dot / (na * nb)
            }
        }
        DistanceKind::Euclid => {
            let d2: f32 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
            -d2.sqrt()
        }
    }
}
