//! Thin adapter around `qdrant-client` implementing [`VectorStore`].
//!
//! Qdrant point ids must be integers or UUIDs, so chunk ids are mapped to a
//! deterministic UUIDv5 ([`stable_uuid`]) and the original id travels in the
//! payload under `chunk_id`, next to `text`.

use std::collections::HashMap;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CountPointsBuilder, CreateCollectionBuilder, Distance, PointId, PointStruct,
    SearchParamsBuilder, SearchPointsBuilder, UpsertPointsBuilder, Value as QValue,
    VectorParamsBuilder, value::Kind,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::{DistanceKind, RagConfig, VectorSpace};
use crate::errors::RagError;
use crate::record::{RagHit, StoredChunk};
use crate::store::{StoreFuture, VectorStore};

const PAYLOAD_CHUNK_ID: &str = "chunk_id";
const PAYLOAD_TEXT: &str = "text";

/// Deterministic UUIDv5 for a chunk id.
pub fn stable_uuid(id: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, id.as_bytes())
}

/// Qdrant-backed collection.
pub struct QdrantFacade {
    client: Qdrant,
    collection: String,
    space: VectorSpace,
    exact: bool,
}

impl QdrantFacade {
    /// Builds the client; no network round-trip happens here.
    pub fn new(cfg: &RagConfig) -> Result<Self, RagError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
            space: cfg.vector_space(),
            exact: cfg.exact_search,
        })
    }

    async fn exists(&self) -> Result<bool, RagError> {
        self.client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| RagError::Qdrant(e.to_string()))
    }

    /// Creates the collection if it is missing.
    pub async fn ensure_collection(&self) -> Result<(), RagError> {
        if self.exists().await? {
            debug!(collection = %self.collection, "collection already exists");
            return Ok(());
        }

        let distance = match self.space.distance {
            DistanceKind::Cosine => Distance::Cosine,
            DistanceKind::Dot => Distance::Dot,
            DistanceKind::Euclid => Distance::Euclid,
        };

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(self.space.size as u64, distance)),
            )
            .await
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        info!(
            collection = %self.collection,
            size = self.space.size,
            distance = ?self.space.distance,
            "collection created"
        );
        Ok(())
    }

    async fn count_points(&self) -> Result<u64, RagError> {
        if !self.exists().await? {
            return Ok(0);
        }
        let res = self
            .client
            .count(CountPointsBuilder::new(&self.collection).exact(true))
            .await
            .map_err(|e| RagError::Qdrant(e.to_string()))?;
        Ok(res.result.map(|r| r.count).unwrap_or(0))
    }

    async fn upsert(&self, chunks: Vec<StoredChunk>) -> Result<u64, RagError> {
        if chunks.is_empty() {
            return Ok(0);
        }
        if let Some(bad) = chunks
            .iter()
            .find(|c| c.embedding.len() != self.space.size)
        {
            return Err(RagError::VectorSizeMismatch {
                got: bad.embedding.len(),
                want: self.space.size,
            });
        }

        self.ensure_collection().await?;

        let n = chunks.len() as u64;
        let points: Vec<PointStruct> = chunks.into_iter().map(to_point).collect();
        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points).wait(true))
            .await
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        debug!(collection = %self.collection, points = n, "upsert acknowledged");
        Ok(n)
    }

    async fn search(&self, vector: &[f32], top_k: u64) -> Result<Vec<RagHit>, RagError> {
        if top_k == 0 || !self.exists().await? {
            return Ok(Vec::new());
        }
        if vector.len() != self.space.size {
            return Err(RagError::VectorSizeMismatch {
                got: vector.len(),
                want: self.space.size,
            });
        }

        let mut builder = SearchPointsBuilder::new(&self.collection, vector.to_vec(), top_k)
            .with_payload(true);
        if self.exact {
            builder = builder.params(SearchParamsBuilder::default().exact(true));
        }

        let res = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        Ok(res
            .result
            .into_iter()
            .map(|p| RagHit {
                id: payload_str(&p.payload, PAYLOAD_CHUNK_ID),
                score: p.score,
                text: payload_str(&p.payload, PAYLOAD_TEXT),
            })
            .collect())
    }
}

impl VectorStore for QdrantFacade {
    fn count(&self) -> StoreFuture<'_, u64> {
        Box::pin(self.count_points())
    }

    fn add(&self, chunks: Vec<StoredChunk>) -> StoreFuture<'_, u64> {
        Box::pin(self.upsert(chunks))
    }

    fn query<'a>(&'a self, vector: &'a [f32], n_results: u64) -> StoreFuture<'a, Vec<RagHit>> {
        Box::pin(self.search(vector, n_results))
    }
}

fn to_point(chunk: StoredChunk) -> PointStruct {
    let pid: PointId = stable_uuid(&chunk.id).to_string().into();
    let mut payload: HashMap<String, QValue> = HashMap::new();
    payload.insert(PAYLOAD_CHUNK_ID.into(), qstring(chunk.id));
    payload.insert(PAYLOAD_TEXT.into(), qstring(chunk.text));
    PointStruct::new(pid, chunk.embedding, payload)
}

fn qstring(s: String) -> QValue {
    QValue {
        kind: Some(Kind::StringValue(s)),
    }
}

fn payload_str(payload: &HashMap<String, QValue>, key: &str) -> String {
    match payload.get(key).and_then(|v| v.kind.as_ref()) {
        Some(Kind::StringValue(s)) => s.clone(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_ids_are_stable_per_chunk_id() {
        assert_eq!(stable_uuid("0"), stable_uuid("0"));
        assert_ne!(stable_uuid("0"), stable_uuid("1"));
    }

    #[test]
    fn point_carries_chunk_id_and_text() {
        let p = to_point(StoredChunk {
            id: "7".into(),
            text: "hello".into(),
            embedding: vec![0.1, 0.2],
        });
        assert_eq!(payload_str(&p.payload, PAYLOAD_CHUNK_ID), "7");
        assert_eq!(payload_str(&p.payload, PAYLOAD_TEXT), "hello");
        assert!(p.id.is_some());
    }

    #[test]
    fn missing_payload_key_reads_as_empty() {
        assert_eq!(payload_str(&HashMap::new(), "text"), "");
    }
}
