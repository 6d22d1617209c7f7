use serde::{Deserialize, Serialize};

use super::{CandidateMovie, MovieId};
use crate::error::{AppError, AppResult};

const MIN_DESCRIPTION_CHARS: usize = 3;
const DEFAULT_MAX_PAGES: u32 = 2;
const MAX_DISCOVERY_PAGES: u32 = 5;

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_REGION: &str = "US";

/// Request body for `POST /semantic/search`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticSearchRequest {
    pub description: Option<String>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub language: Option<String>,
    /// Accepted for compatibility; the free-text path always starts at page 1
    pub page: Option<u32>,
    pub max_pages: Option<i64>,
}

/// Request body for `POST /semantic/streaming`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSearchRequest {
    pub description: Option<String>,
    pub platforms: Option<Vec<String>>,
    pub region: Option<String>,
    pub language: Option<String>,
}

/// A validated free-text query
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticQuery {
    /// Description as submitted; it doubles as the query-vector cache key
    pub description: String,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub language: String,
    /// Discovery depth per sort order, always within `1..=5`
    pub max_pages: u32,
}

impl SemanticQuery {
    pub fn from_request(request: SemanticSearchRequest) -> AppResult<Self> {
        Ok(Self {
            description: validate_description(request.description)?,
            year_from: request.year_from,
            year_to: request.year_to,
            language: language_or_default(request.language),
            max_pages: clamp_max_pages(request.max_pages),
        })
    }
}

/// A validated platform-scoped query
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformQuery {
    pub description: String,
    pub platforms: Vec<String>,
    pub region: String,
    pub language: String,
}

impl PlatformQuery {
    pub fn from_request(request: PlatformSearchRequest) -> AppResult<Self> {
        let description = validate_description(request.description)?;
        let platforms = request.platforms.unwrap_or_default();
        if platforms.is_empty() {
            return Err(AppError::InvalidInput(
                "platforms must be a non-empty array".to_string(),
            ));
        }

        Ok(Self {
            description,
            platforms,
            region: request
                .region
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            language: language_or_default(request.language),
        })
    }
}

/// Clamps a requested discovery depth to `1..=5`; absent means 2
pub fn clamp_max_pages(requested: Option<i64>) -> u32 {
    match requested {
        None => DEFAULT_MAX_PAGES,
        Some(pages) => pages.clamp(1, MAX_DISCOVERY_PAGES as i64) as u32,
    }
}

fn validate_description(description: Option<String>) -> AppResult<String> {
    match description {
        Some(text) if text.trim().chars().count() >= MIN_DESCRIPTION_CHARS => Ok(text),
        _ => Err(AppError::InvalidInput(format!(
            "description is required and must be at least {} characters",
            MIN_DESCRIPTION_CHARS
        ))),
    }
}

fn language_or_default(language: Option<String>) -> String {
    language
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}

/// A candidate projected for the response, with its similarity score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedResult {
    pub id: MovieId,
    pub title: String,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: f64,
    pub poster_path: Option<String>,
    /// `None` only in fallback responses
    pub similarity: Option<f64>,
}

impl RankedResult {
    pub(crate) fn scored(movie: CandidateMovie, similarity: f64) -> Self {
        Self::project(movie, Some(similarity))
    }

    fn unscored(movie: CandidateMovie) -> Self {
        Self::project(movie, None)
    }

    fn project(movie: CandidateMovie, similarity: Option<f64>) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            overview: movie.overview,
            release_date: movie.release_date,
            vote_average: movie.vote_average,
            poster_path: movie.poster_path,
            similarity,
        }
    }
}

/// Response body for both semantic endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SemanticSearchResponse {
    pub success: bool,
    pub fallback: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub count: usize,
    pub results: Vec<RankedResult>,
}

impl SemanticSearchResponse {
    /// Full-fidelity response; every result carries a similarity
    pub fn ranked(results: Vec<RankedResult>) -> Self {
        debug_assert!(results.iter().all(|r| r.similarity.is_some()));
        Self {
            success: true,
            fallback: false,
            reason: None,
            count: results.len(),
            results,
        }
    }

    /// Reduced-fidelity response built from unranked catalog results
    pub fn fallback(candidates: Vec<CandidateMovie>, reason: impl Into<String>) -> Self {
        let results: Vec<RankedResult> =
            candidates.into_iter().map(RankedResult::unscored).collect();
        Self {
            success: true,
            fallback: true,
            reason: Some(reason.into()),
            count: results.len(),
            results,
        }
    }
}
