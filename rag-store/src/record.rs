//! Core data models used by the library.

use serde::{Deserialize, Serialize};

/// A chunk of knowledge text before embedding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    /// Zero-based position in corpus order, as a string.
    pub id: String,
    /// Non-empty, trimmed text.
    pub text: String,
}

/// Canonical record persisted in the vector store.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StoredChunk {
    pub id: String,
    pub text: String,
    pub embedding: Vec<f32>,
}

/// A single retrieval hit, ranked by descending similarity.
#[derive(Clone, Debug, PartialEq)]
pub struct RagHit {
    pub id: String,
    pub score: f32,
    pub text: String,
}
