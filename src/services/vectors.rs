use std::sync::Arc;

use crate::{
    cache::{CacheKey, CacheService},
    cached,
    error::AppResult,
    models::{CandidateMovie, EmbeddingVector},
    services::embedding::Embedder,
};

/// Cache-first access to query and movie embeddings
///
/// Both stores are content-addressed: a query vector is keyed by the exact
/// query text and a movie vector by the catalog id. A failed embed call
/// leaves the stores untouched.
#[derive(Clone)]
pub struct VectorCache {
    embedder: Embedder,
    caches: Arc<CacheService>,
}

impl VectorCache {
    pub fn new(embedder: Embedder, caches: Arc<CacheService>) -> Self {
        Self { embedder, caches }
    }

    pub fn is_configured(&self) -> bool {
        self.embedder.is_configured()
    }

    pub async fn embed_query(&self, text: &str) -> AppResult<EmbeddingVector> {
        cached!(
            self.caches.query_vectors(),
            CacheKey::QueryVector(text.to_string()),
            self.embedder.embed(text)
        )
    }

    pub async fn embed_movie(&self, movie: &CandidateMovie) -> AppResult<EmbeddingVector> {
        cached!(
            self.caches.movie_vectors(),
            CacheKey::MovieVector(movie.id),
            async { self.embedder.embed(&movie_text(movie)).await }
        )
    }
}

/// Text embedded for a movie: `"{title} ({release_date})\n{overview}"`
pub fn movie_text(movie: &CandidateMovie) -> String {
    format!(
        "{} ({})\n{}",
        movie.title,
        movie.release_date.as_deref().unwrap_or(""),
        movie.overview.as_deref().unwrap_or("")
    )
    .trim()
    .to_string()
}
