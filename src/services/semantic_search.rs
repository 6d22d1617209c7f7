//! Semantic search with graceful degradation
//!
//! Each request walks an explicit state machine:
//!
//! ```text
//! Normal ──ok──────────────▶ ranked response (fallback = false)
//!   │ any failure
//!   ▼
//! Degraded(reason) ──ok────▶ unranked response (fallback = true)
//!   ▲      └───error───────▶ FallbackFailed
//!   │
//! Unconfigured (no embedding provider, free-text endpoint only)
//! ```
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{
        CandidateMovie, PlatformQuery, PlatformSearchRequest, RankedResult, SemanticQuery,
        SemanticSearchRequest, SemanticSearchResponse,
    },
    services::{
        aggregate,
        catalog::{DiscoverFilters, MovieCatalog},
        platforms::PlatformResolver,
        ranking::{self, FALLBACK_LIMIT, FREE_TEXT_LIMIT, PLATFORM_LIMIT},
        retrieval::CatalogRetriever,
        vectors::VectorCache,
    },
};

/// Fallback reason reported when no embedding provider is configured
pub const UNCONFIGURED_REASON: &str = "embedding not configured";

const MIN_VOTE_COUNT: u32 = 10;

/// Per-request pipeline state
#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    Normal,
    Unconfigured,
    Degraded { reason: String },
}

impl SearchState {
    fn initial(embedding_configured: bool) -> Self {
        if embedding_configured {
            SearchState::Normal
        } else {
            SearchState::Unconfigured
        }
    }
}

#[derive(Clone)]
pub struct SemanticSearchService {
    catalog: Arc<dyn MovieCatalog>,
    retriever: CatalogRetriever,
    vectors: VectorCache,
    platforms: Arc<dyn PlatformResolver>,
}

impl SemanticSearchService {
    pub fn new(
        catalog: Arc<dyn MovieCatalog>,
        vectors: VectorCache,
        platforms: Arc<dyn PlatformResolver>,
    ) -> Self {
        Self {
            retriever: CatalogRetriever::new(catalog.clone()),
            catalog,
            vectors,
            platforms,
        }
    }

    pub fn embedding_configured(&self) -> bool {
        self.vectors.is_configured()
    }

    /// Free-text semantic search
    ///
    /// Never fails because of the embedding provider or the catalog alone:
    /// those failures degrade to a single text search. Fails only on invalid
    /// input or when that fallback search fails too.
    pub async fn search(
        &self,
        request: SemanticSearchRequest,
    ) -> AppResult<SemanticSearchResponse> {
        let query = SemanticQuery::from_request(request)?;
        let mut state = SearchState::initial(self.vectors.is_configured());

        loop {
            state = match state {
                SearchState::Normal => match self.rank_free_text(&query).await {
                    Ok(results) => {
                        tracing::info!(results = results.len(), "Semantic search ranked");
                        return Ok(SemanticSearchResponse::ranked(results));
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Semantic search degraded");
                        SearchState::Degraded {
                            reason: e.to_string(),
                        }
                    }
                },
                SearchState::Unconfigured => SearchState::Degraded {
                    reason: UNCONFIGURED_REASON.to_string(),
                },
                SearchState::Degraded { reason } => {
                    let fallback = self.catalog.search_by_text(&query.description, 1).await;
                    return into_fallback_response(fallback, reason);
                }
            };
        }
    }

    /// Semantic search restricted to titles on the given streaming platforms
    ///
    /// A missing embedding provider is a hard `ProviderUnconfigured` failure
    /// here; only failures during ranking degrade.
    pub async fn search_platforms(
        &self,
        request: PlatformSearchRequest,
    ) -> AppResult<SemanticSearchResponse> {
        let query = PlatformQuery::from_request(request)?;
        if !self.vectors.is_configured() {
            return Err(AppError::ProviderUnconfigured);
        }

        let provider_ids = self
            .platforms
            .provider_ids_for(&query.platforms, &query.region);
        if provider_ids.is_empty() {
            return Err(AppError::NoValidPlatforms {
                available_platforms: self.platforms.platform_ids(),
            });
        }

        let filters = DiscoverFilters {
            language: Some(query.language.clone()),
            min_vote_count: Some(MIN_VOTE_COUNT),
            watch_providers: provider_ids,
            watch_region: Some(query.region.clone()),
            ..Default::default()
        };

        let mut state = SearchState::Normal;
        loop {
            state = match state {
                SearchState::Normal => match self.rank_platform(&query, &filters).await {
                    Ok(results) => {
                        tracing::info!(
                            results = results.len(),
                            platforms = ?query.platforms,
                            "Platform semantic search ranked"
                        );
                        return Ok(SemanticSearchResponse::ranked(results));
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Platform semantic search degraded");
                        SearchState::Degraded {
                            reason: e.to_string(),
                        }
                    }
                },
                // Rejected above; kept so every state has a transition
                SearchState::Unconfigured => return Err(AppError::ProviderUnconfigured),
                SearchState::Degraded { reason } => {
                    let fallback = self
                        .catalog
                        .discover(&filters, 1)
                        .await
                        .map(|page| page.results);
                    return into_fallback_response(fallback, reason);
                }
            };
        }
    }

    async fn rank_free_text(&self, query: &SemanticQuery) -> AppResult<Vec<RankedResult>> {
        let query_vector = self.vectors.embed_query(&query.description).await?;
        let strategy_outputs = self.retriever.retrieve(query).await?;
        let candidates = aggregate::merge(strategy_outputs);

        tracing::debug!(candidates = candidates.len(), "Candidates aggregated");

        let scored = self.score(&query_vector, candidates).await?;
        Ok(ranking::rank(scored, FREE_TEXT_LIMIT))
    }

    async fn rank_platform(
        &self,
        query: &PlatformQuery,
        filters: &DiscoverFilters,
    ) -> AppResult<Vec<RankedResult>> {
        let query_vector = self.vectors.embed_query(&query.description).await?;
        let discovered = self.catalog.discover(filters, 1).await?;
        let candidates = aggregate::merge([discovered.results]);

        let scored = self.score(&query_vector, candidates).await?;
        Ok(ranking::rank(scored, PLATFORM_LIMIT))
    }

    /// Embeds each candidate in turn and scores it against the query vector
    async fn score(
        &self,
        query_vector: &[f32],
        candidates: Vec<CandidateMovie>,
    ) -> AppResult<Vec<(CandidateMovie, f64)>> {
        let mut scored = Vec::with_capacity(candidates.len());
        for movie in candidates {
            let movie_vector = self.vectors.embed_movie(&movie).await?;
            let similarity = ranking::cosine_similarity(query_vector, &movie_vector);
            scored.push((movie, similarity));
        }
        Ok(scored)
    }
}

fn into_fallback_response(
    fallback: AppResult<Vec<CandidateMovie>>,
    reason: String,
) -> AppResult<SemanticSearchResponse> {
    match fallback {
        Ok(mut candidates) => {
            candidates.truncate(FALLBACK_LIMIT);
            tracing::info!(
                results = candidates.len(),
                reason = %reason,
                "Serving fallback results"
            );
            Ok(SemanticSearchResponse::fallback(candidates, reason))
        }
        Err(e) => {
            tracing::error!(reason = %reason, error = %e, "Fallback failed");
            Err(AppError::FallbackFailed {
                reason,
                message: e.to_string(),
            })
        }
    }
}
