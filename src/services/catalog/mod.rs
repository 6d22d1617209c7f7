//! Movie catalog abstraction
//!
//! The pipeline only needs three catalog capabilities: free-text search,
//! filtered discovery, and keyword lookup. `TmdbCatalog` is the production
//! implementation; tests substitute mocks or fakes.
use crate::{
    error::AppResult,
    models::{CandidateMovie, ContentType, DiscoverPage, Keyword},
};

#[cfg(test)]
use mockall::automock;

pub mod tmdb;

pub use tmdb::TmdbCatalog;

/// Trait for external movie catalogs
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Free-text title search
    async fn search_by_text(&self, query: &str, page: u32) -> AppResult<Vec<CandidateMovie>>;

    /// Paginated, filtered, sorted discovery
    async fn discover(&self, filters: &DiscoverFilters, page: u32) -> AppResult<DiscoverPage>;

    /// Resolve a word to the catalog's keyword identifiers
    async fn search_keyword(&self, token: &str) -> AppResult<Vec<Keyword>>;
}

/// Discovery sort orders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    PopularityDesc,
    VoteAverageDesc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::PopularityDesc => "popularity.desc",
            SortOrder::VoteAverageDesc => "vote_average.desc",
        }
    }
}

/// Filters for a discovery call; pagination is passed separately
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverFilters {
    pub content_type: ContentType,
    pub sort_by: SortOrder,
    pub language: Option<String>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub min_vote_count: Option<u32>,
    pub min_vote_average: Option<f64>,
    pub keyword_id: Option<u64>,
    pub watch_providers: Vec<u32>,
    pub watch_region: Option<String>,
}

impl Default for DiscoverFilters {
    fn default() -> Self {
        Self {
            content_type: ContentType::Movie,
            sort_by: SortOrder::PopularityDesc,
            language: None,
            year_from: None,
            year_to: None,
            min_vote_count: None,
            min_vote_average: None,
            keyword_id: None,
            watch_providers: Vec::new(),
            watch_region: None,
        }
    }
}

impl DiscoverFilters {
    /// Query parameters in TMDB's discover vocabulary
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("sort_by", self.sort_by.as_str().to_string()),
            ("include_adult", "false".to_string()),
            ("include_video", "false".to_string()),
        ];

        if let Some(language) = &self.language {
            params.push(("with_original_language", language.clone()));
        }

        let (date_from, date_to) = match self.content_type {
            ContentType::Movie => ("primary_release_date.gte", "primary_release_date.lte"),
            ContentType::Tv => ("first_air_date.gte", "first_air_date.lte"),
        };
        if let Some(year) = self.year_from {
            params.push((date_from, format!("{}-01-01", year)));
        }
        if let Some(year) = self.year_to {
            params.push((date_to, format!("{}-12-31", year)));
        }

        if let Some(count) = self.min_vote_count {
            params.push(("vote_count.gte", count.to_string()));
        }
        if let Some(average) = self.min_vote_average {
            params.push(("vote_average.gte", average.to_string()));
        }
        if let Some(keyword_id) = self.keyword_id {
            params.push(("with_keywords", keyword_id.to_string()));
        }

        if !self.watch_providers.is_empty() {
            let providers: Vec<String> = self.watch_providers.iter().map(u32::to_string).collect();
            params.push(("with_watch_providers", providers.join("|")));
        }
        if let Some(region) = &self.watch_region {
            params.push(("watch_region", region.clone()));
        }

        params
    }
}
