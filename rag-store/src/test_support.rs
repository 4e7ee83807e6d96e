//! Deterministic providers and a counting store for unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::{future::Future, pin::Pin};

use crate::embed::EmbeddingsProvider;
use crate::errors::RagError;
use crate::record::{RagHit, StoredChunk};
use crate::store::{StoreFuture, VectorStore};

/// Returns the same vector for every input.
pub struct FixedEmbedder(pub Vec<f32>);

impl EmbeddingsProvider for FixedEmbedder {
    fn embed<'a>(
        &'a self,
        _text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, RagError>> + Send + 'a>> {
        let v = self.0.clone();
        Box::pin(async move { Ok(v) })
    }
}

/// One axis per keyword: component `i` is 1.0 when the lowercased text
/// contains `keywords[i]`.
pub struct KeywordEmbedder {
    keywords: Vec<String>,
    calls: AtomicUsize,
}

impl KeywordEmbedder {
    pub fn new(keywords: &[&str]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EmbeddingsProvider for KeywordEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, RagError>> + Send + 'a>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let lower = text.to_lowercase();
        let v = self
            .keywords
            .iter()
            .map(|k| if lower.contains(k.as_str()) { 1.0 } else { 0.0 })
            .collect();
        Box::pin(async move { Ok(v) })
    }
}

/// Store whose every call fails.
pub struct BrokenStore;

impl VectorStore for BrokenStore {
    fn count(&self) -> StoreFuture<'_, u64> {
        Box::pin(async { Err(RagError::Qdrant("unreachable".into())) })
    }

    fn add(&self, _chunks: Vec<StoredChunk>) -> StoreFuture<'_, u64> {
        Box::pin(async { Err(RagError::Qdrant("unreachable".into())) })
    }

    fn query<'a>(&'a self, _vector: &'a [f32], _n: u64) -> StoreFuture<'a, Vec<RagHit>> {
        Box::pin(async { Err(RagError::Qdrant("unreachable".into())) })
    }
}

/// In-memory store that records how many `add` calls it received.
#[derive(Default)]
pub struct CountingStore {
    chunks: Mutex<Vec<StoredChunk>>,
    adds: AtomicUsize,
}

impl CountingStore {
    pub fn adds(&self) -> usize {
        self.adds.load(Ordering::SeqCst)
    }

    pub fn ids(&self) -> Vec<String> {
        self.chunks
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.id.clone())
            .collect()
    }
}

impl VectorStore for CountingStore {
    fn count(&self) -> StoreFuture<'_, u64> {
        let n = self.chunks.lock().unwrap().len() as u64;
        Box::pin(async move { Ok(n) })
    }

    fn add(&self, chunks: Vec<StoredChunk>) -> StoreFuture<'_, u64> {
        self.adds.fetch_add(1, Ordering::SeqCst);
        let n = chunks.len() as u64;
        self.chunks.lock().unwrap().extend(chunks);
        Box::pin(async move { Ok(n) })
    }

    fn query<'a>(&'a self, _vector: &'a [f32], n: u64) -> StoreFuture<'a, Vec<RagHit>> {
        let hits = self
            .chunks
            .lock()
            .unwrap()
            .iter()
            .take(n as usize)
            .map(|c| RagHit {
                id: c.id.clone(),
                score: 0.0,
                text: c.text.clone(),
            })
            .collect();
        Box::pin(async move { Ok(hits) })
    }
}
