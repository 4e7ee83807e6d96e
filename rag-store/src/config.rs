//! Runtime and collection configuration.

use std::path::PathBuf;
use std::str::FromStr;

use crate::errors::RagError;

/// Distance function used for the vector space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceKind {
    /// Cosine similarity (recommended for most embeddings).
    Cosine,
    /// Dot product (useful for normalized vectors).
    Dot,
    /// Euclidean distance (L2).
    Euclid,
}

impl FromStr for DistanceKind {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cosine" => Ok(DistanceKind::Cosine),
            "dot" => Ok(DistanceKind::Dot),
            "euclid" | "euclidean" | "l2" => Ok(DistanceKind::Euclid),
            other => Err(RagError::Config(format!("unknown distance: {other}"))),
        }
    }
}

/// Describes the vector space of the collection.
#[derive(Clone, Debug)]
pub struct VectorSpace {
    /// Dimensionality of vectors.
    pub size: usize,
    /// Distance function.
    pub distance: DistanceKind,
}

/// Which vector store implementation backs the collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    /// Collection persisted as a JSON file under `persist_dir`.
    Local,
    /// Remote Qdrant collection.
    Qdrant,
}

impl FromStr for StoreBackend {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(StoreBackend::Local),
            "qdrant" => Ok(StoreBackend::Qdrant),
            other => Err(RagError::Config(format!("unknown vector backend: {other}"))),
        }
    }
}

/// Configuration for ingestion and retrieval.
#[derive(Clone, Debug)]
pub struct RagConfig {
    /// Store implementation.
    pub backend: StoreBackend,
    /// Directory for the local backend.
    pub persist_dir: PathBuf,
    /// Target collection name.
    pub collection: String,
    /// Qdrant endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Distance function (Cosine by default).
    pub distance: DistanceKind,
    /// Exact search flag for Qdrant (false = HNSW ANN).
    pub exact_search: bool,
    /// Expected embedding dimensionality; also the zero-fallback size.
    pub embedding_dim: usize,
    /// Max in-flight embedding calls during ingestion.
    pub embedding_concurrency: usize,
    /// Chunks per `add` call during ingestion.
    pub upsert_batch: usize,
    /// Knowledge corpus read at startup.
    pub corpus_path: PathBuf,
    /// Neighbors returned per query.
    pub top_k: u64,
}

impl RagConfig {
    /// Creates a sane default config for a given persistence directory and collection.
    pub fn new_default(persist_dir: impl Into<PathBuf>, collection: impl Into<String>) -> Self {
        Self {
            backend: StoreBackend::Local,
            persist_dir: persist_dir.into(),
            collection: collection.into(),
            qdrant_url: "http://127.0.0.1:6334".into(),
            qdrant_api_key: None,
            distance: DistanceKind::Cosine,
            exact_search: false,
            embedding_dim: 1536,
            embedding_concurrency: 1,
            upsert_batch: 256,
            corpus_path: PathBuf::from("data.txt"),
            top_k: 4,
        }
    }

    /// Build from environment variables with defaults, then validate.
    ///
    /// # Errors
    /// Returns `RagError::Config` on unparsable or invalid values.
    pub fn from_env() -> Result<Self, RagError> {
        let mut cfg = Self::new_default(
            env("VECTOR_PERSIST_DIR", "./chroma_data"),
            env("VECTOR_COLLECTION", "company"),
        );

        cfg.backend = env("VECTOR_BACKEND", "local").parse()?;
        cfg.distance = env("VECTOR_DISTANCE", "cosine").parse()?;
        cfg.qdrant_url = env("QDRANT_URL", &cfg.qdrant_url);
        cfg.qdrant_api_key = std::env::var("QDRANT_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        cfg.exact_search = parse("RAG_EXACT_SEARCH", cfg.exact_search)?;
        cfg.embedding_dim = parse("EMBEDDING_DIM", cfg.embedding_dim)?;
        cfg.embedding_concurrency = parse("EMBEDDING_CONCURRENCY", cfg.embedding_concurrency)?;
        cfg.upsert_batch = parse("UPSERT_BATCH", cfg.upsert_batch)?;
        cfg.corpus_path = PathBuf::from(env("CORPUS_PATH", "data.txt"));
        cfg.top_k = parse("RAG_TOP_K", cfg.top_k)?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), RagError> {
        if self.collection.trim().is_empty() {
            return Err(RagError::Config("collection is empty".into()));
        }
        if self.backend == StoreBackend::Qdrant && self.qdrant_url.trim().is_empty() {
            return Err(RagError::Config("qdrant_url is empty".into()));
        }
        if self.embedding_dim == 0 {
            return Err(RagError::Config("embedding_dim must be > 0".into()));
        }
        if self.upsert_batch == 0 {
            return Err(RagError::Config("upsert_batch must be > 0".into()));
        }
        if self.embedding_concurrency == 0 {
            return Err(RagError::Config("embedding_concurrency must be > 0".into()));
        }
        if self.top_k == 0 {
            return Err(RagError::Config("top_k must be > 0".into()));
        }
        Ok(())
    }

    /// The vector space every stored embedding must belong to.
    pub fn vector_space(&self) -> VectorSpace {
        VectorSpace {
            size: self.embedding_dim,
            distance: self.distance,
        }
    }
}

fn env(k: &str, dflt: &str) -> String {
    std::env::var(k)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| dflt.to_string())
}

fn parse<T: FromStr>(k: &str, dflt: T) -> Result<T, RagError> {
    match std::env::var(k) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse()
            .map_err(|_| RagError::Config(format!("invalid value for {k}: {v}"))),
        _ => Ok(dflt),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_and_distance() {
        assert_eq!("Qdrant".parse::<StoreBackend>().unwrap(), StoreBackend::Qdrant);
        assert_eq!("l2".parse::<DistanceKind>().unwrap(), DistanceKind::Euclid);
        assert!("faiss".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn defaults_are_valid() {
        let cfg = RagConfig::new_default("./chroma_data", "company");
        cfg.validate().unwrap();
        assert_eq!(cfg.top_k, 4);
        assert_eq!(cfg.vector_space().size, 1536);
    }

    #[test]
    fn zero_top_k_is_rejected() {
        let mut cfg = RagConfig::new_default("./d", "c");
        cfg.top_k = 0;
        assert!(matches!(cfg.validate(), Err(RagError::Config(_))));
    }
}
