//! Multi-strategy candidate retrieval
//!
//! Strategies, in priority order:
//! 1. Direct text search on the description (page 1)
//! 2. Multi-sort discovery: popularity and rating, `max_pages` pages each
//! 3. Keyword expansion: description tokens → keyword ids → discovery
//!
//! Strategies run one after another and never abort each other. A strategy
//! only counts as failed when every catalog call it made failed.
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{CandidateMovie, SemanticQuery},
    services::catalog::{DiscoverFilters, MovieCatalog, SortOrder},
};

const MIN_VOTE_COUNT: u32 = 10;
const MIN_TOKEN_CHARS: usize = 4;
const MAX_EXPANSION_TOKENS: usize = 5;
const DISCOVERY_SORTS: [SortOrder; 2] = [SortOrder::PopularityDesc, SortOrder::VoteAverageDesc];
const STOP_WORDS: [&str; 7] = ["movie", "about", "with", "from", "that", "this", "which"];

/// Candidate lists, one per strategy that produced anything, in priority order
pub type StrategyOutputs = Vec<Vec<CandidateMovie>>;

/// Tallies catalog calls within one strategy
#[derive(Debug, Default)]
struct CallTally {
    succeeded: usize,
    last_error: Option<AppError>,
}

impl CallTally {
    fn record<T>(&mut self, result: AppResult<T>) -> Option<T> {
        match result {
            Ok(value) => {
                self.succeeded += 1;
                Some(value)
            }
            Err(e) => {
                self.last_error = Some(e);
                None
            }
        }
    }

    /// Failed as a whole: at least one call, none succeeded
    fn into_outcome(self, candidates: Vec<CandidateMovie>) -> AppResult<Vec<CandidateMovie>> {
        match self.last_error {
            Some(e) if self.succeeded == 0 => Err(e),
            _ => Ok(candidates),
        }
    }
}

#[derive(Clone)]
pub struct CatalogRetriever {
    catalog: Arc<dyn MovieCatalog>,
}

impl CatalogRetriever {
    pub fn new(catalog: Arc<dyn MovieCatalog>) -> Self {
        Self { catalog }
    }

    /// Runs every strategy and returns their outputs in priority order
    ///
    /// Fails with `CatalogCallFailed` only when all three strategies failed.
    pub async fn retrieve(&self, query: &SemanticQuery) -> AppResult<StrategyOutputs> {
        let outcomes = [
            ("text_search", self.text_search(query).await),
            ("multi_sort_discovery", self.multi_sort_discovery(query).await),
            ("keyword_expansion", self.keyword_expansion(query).await),
        ];

        let mut outputs = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for (strategy, outcome) in outcomes {
            match outcome {
                Ok(candidates) => {
                    tracing::debug!(
                        strategy = strategy,
                        candidates = candidates.len(),
                        "Retrieval strategy completed"
                    );
                    outputs.push(candidates);
                }
                Err(e) => {
                    tracing::warn!(strategy = strategy, error = %e, "Retrieval strategy failed");
                    failures.push(format!("{}: {}", strategy, e));
                }
            }
        }

        if outputs.is_empty() {
            return Err(AppError::CatalogCallFailed(format!(
                "All retrieval strategies failed ({})",
                failures.join("; ")
            )));
        }

        Ok(outputs)
    }

    async fn text_search(&self, query: &SemanticQuery) -> AppResult<Vec<CandidateMovie>> {
        self.catalog.search_by_text(&query.description, 1).await
    }

    async fn multi_sort_discovery(&self, query: &SemanticQuery) -> AppResult<Vec<CandidateMovie>> {
        let mut tally = CallTally::default();
        let mut candidates = Vec::new();

        for sort_by in DISCOVERY_SORTS {
            let filters = DiscoverFilters {
                sort_by,
                language: Some(query.language.clone()),
                year_from: query.year_from,
                year_to: query.year_to,
                min_vote_count: Some(MIN_VOTE_COUNT),
                ..Default::default()
            };

            for page in 1..=query.max_pages {
                let result = self.catalog.discover(&filters, page).await;
                if let Err(e) = &result {
                    tracing::warn!(
                        sort_by = sort_by.as_str(),
                        page = page,
                        error = %e,
                        "Discovery page failed, skipping"
                    );
                }
                if let Some(discovered) = tally.record(result) {
                    candidates.extend(discovered.results);
                }
            }
        }

        tally.into_outcome(candidates)
    }

    async fn keyword_expansion(&self, query: &SemanticQuery) -> AppResult<Vec<CandidateMovie>> {
        let mut tally = CallTally::default();
        let mut candidates = Vec::new();

        for token in expansion_tokens(&query.description) {
            let keyword_id = match tally.record(self.catalog.search_keyword(&token).await) {
                Some(keywords) => match keywords.first() {
                    Some(keyword) => keyword.id,
                    None => continue,
                },
                None => {
                    tracing::debug!(token = %token, "Keyword lookup failed, skipping token");
                    continue;
                }
            };

            let filters = DiscoverFilters {
                language: Some(query.language.clone()),
                min_vote_count: Some(MIN_VOTE_COUNT),
                keyword_id: Some(keyword_id),
                ..Default::default()
            };

            match tally.record(self.catalog.discover(&filters, 1).await) {
                Some(discovered) => candidates.extend(discovered.results),
                None => tracing::debug!(
                    token = %token,
                    keyword_id = keyword_id,
                    "Keyword discovery failed, skipping token"
                ),
            }
        }

        tally.into_outcome(candidates)
    }
}

/// Derives up to five keyword-search tokens from a description
///
/// Lowercases, splits on anything outside `[a-z0-9]`, keeps tokens of at
/// least four characters that are not stop words, and deduplicates in
/// first-seen order.
pub fn expansion_tokens(description: &str) -> Vec<String> {
    let lowered = description.to_lowercase();
    let mut tokens: Vec<String> = Vec::new();

    for word in lowered.split(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit())) {
        if word.len() < MIN_TOKEN_CHARS || STOP_WORDS.contains(&word) {
            continue;
        }
        if tokens.iter().any(|t| t == word) {
            continue;
        }
        tokens.push(word.to_string());
        if tokens.len() == MAX_EXPANSION_TOKENS {
            break;
        }
    }

    tokens
}
