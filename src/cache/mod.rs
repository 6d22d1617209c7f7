mod macros;
mod ttl;

pub use ttl::TtlCache;

use std::collections::BTreeSet;
use std::fmt::Display;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Serialize;

use crate::models::{CandidateMovie, ContentType, EmbeddingVector, MovieId};

/// Content-addressed cache keys
///
/// A key is derived only from the content that produced the cached value, so
/// concurrent writers for the same key always store the same thing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Query text, kept verbatim: case and whitespace variants are distinct
    QueryVector(String),
    MovieVector(MovieId),
    StreamingDiscover {
        platforms: Vec<String>,
        region: String,
        content_type: ContentType,
        page: u32,
    },
}

impl CacheKey {
    /// Builds a streaming key whose platform list is sorted and deduplicated
    pub fn streaming_discover(
        platforms: &[String],
        region: &str,
        content_type: ContentType,
        page: u32,
    ) -> Self {
        let platforms: BTreeSet<&String> = platforms.iter().collect();
        CacheKey::StreamingDiscover {
            platforms: platforms.into_iter().cloned().collect(),
            region: region.to_string(),
            content_type,
            page,
        }
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::QueryVector(text) => write!(f, "q:{}", STANDARD.encode(text)),
            CacheKey::MovieVector(id) => write!(f, "m:{}", id),
            CacheKey::StreamingDiscover {
                platforms,
                region,
                content_type,
                page,
            } => write!(
                f,
                "streaming_{}_{}_{}_page_{}",
                content_type,
                region,
                platforms.join(","),
                page
            ),
        }
    }
}

/// Entry counts per store, reported by the health endpoint
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct CacheStats {
    pub query_vectors: usize,
    pub movie_vectors: usize,
    pub streaming_results: usize,
}

/// Owner of every process-wide cache
///
/// Constructed once at startup and shared through `Arc`; `clear` empties all
/// stores (used by `DELETE /cache` and on shutdown).
#[derive(Debug)]
pub struct CacheService {
    query_vectors: TtlCache<CacheKey, EmbeddingVector>,
    movie_vectors: TtlCache<CacheKey, EmbeddingVector>,
    streaming_results: TtlCache<CacheKey, Vec<CandidateMovie>>,
}

impl CacheService {
    pub fn new(vector_ttl: Duration, results_ttl: Duration) -> Self {
        Self {
            query_vectors: TtlCache::new(vector_ttl),
            movie_vectors: TtlCache::new(vector_ttl),
            streaming_results: TtlCache::new(results_ttl),
        }
    }

    pub fn query_vectors(&self) -> &TtlCache<CacheKey, EmbeddingVector> {
        &self.query_vectors
    }

    pub fn movie_vectors(&self) -> &TtlCache<CacheKey, EmbeddingVector> {
        &self.movie_vectors
    }

    pub fn streaming_results(&self) -> &TtlCache<CacheKey, Vec<CandidateMovie>> {
        &self.streaming_results
    }

    pub fn clear(&self) {
        self.query_vectors.flush_all();
        self.movie_vectors.flush_all();
        self.streaming_results.flush_all();
        tracing::info!("All caches cleared");
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            query_vectors: self.query_vectors.size(),
            movie_vectors: self.movie_vectors.size(),
            streaming_results: self.streaming_results.size(),
        }
    }
}
