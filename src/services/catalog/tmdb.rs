//! TMDB (The Movie Database) catalog provider
//!
//! API Flow:
//! 1. Text search: /search/movie → first page of literal title matches
//! 2. Discovery: /discover/{movie|tv} → filtered, sorted, paginated results
//! 3. Keywords: /search/keyword → keyword IDs usable as discovery filters
//!
//! Every call carries `api_key` as a query parameter and is bounded by the
//! client timeout.
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::{de::DeserializeOwned, Deserialize};

use crate::{
    error::{AppError, AppResult},
    models::{CandidateMovie, DiscoverPage, Keyword},
    services::{
        catalog::{DiscoverFilters, MovieCatalog},
        truncate_chars,
    },
};

/// Longest free-text query forwarded to the search endpoint
const MAX_QUERY_CHARS: usize = 500;

#[derive(Debug, Deserialize)]
struct SearchResponse<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Clone)]
pub struct TmdbCatalog {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbCatalog {
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Issues a GET against `path` and decodes the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| {
                AppError::CatalogCallFailed(format!(
                    "TMDB request to {} failed: {}",
                    path,
                    e.without_url()
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                path = %path,
                status = status.as_u16(),
                body = %body,
                provider = "tmdb",
                "TMDB returned an error status"
            );
            return Err(AppError::CatalogCallFailed(format!(
                "TMDB API returned status {}",
                status
            )));
        }

        response.json::<T>().await.map_err(|e| {
            AppError::CatalogCallFailed(format!(
                "Failed to parse TMDB response from {}: {}",
                path,
                e.without_url()
            ))
        })
    }
}

#[async_trait::async_trait]
impl MovieCatalog for TmdbCatalog {
    async fn search_by_text(&self, query: &str, page: u32) -> AppResult<Vec<CandidateMovie>> {
        let params = [
            ("query", truncate_chars(query, MAX_QUERY_CHARS).to_string()),
            ("include_adult", "false".to_string()),
            ("page", page.to_string()),
        ];

        let response: SearchResponse<CandidateMovie> =
            self.get_json("/search/movie", &params).await?;

        tracing::info!(
            query = %query,
            results = response.results.len(),
            provider = "tmdb",
            "Text search completed"
        );

        Ok(response.results)
    }

    async fn discover(&self, filters: &DiscoverFilters, page: u32) -> AppResult<DiscoverPage> {
        let mut params = filters.to_query_pairs();
        params.push(("page", page.to_string()));

        let path = format!("/discover/{}", filters.content_type);
        let discovered: DiscoverPage = self.get_json(&path, &params).await?;

        tracing::info!(
            sort_by = filters.sort_by.as_str(),
            page = page,
            results = discovered.results.len(),
            total_pages = discovered.total_pages,
            provider = "tmdb",
            "Discovery completed"
        );

        Ok(discovered)
    }

    async fn search_keyword(&self, token: &str) -> AppResult<Vec<Keyword>> {
        let params = [("query", token.to_string()), ("page", "1".to_string())];

        let response: SearchResponse<Keyword> = self.get_json("/search/keyword", &params).await?;

        tracing::debug!(
            token = %token,
            results = response.results.len(),
            provider = "tmdb",
            "Keyword search completed"
        );

        Ok(response.results)
    }
}
