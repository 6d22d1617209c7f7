use serde::{Deserialize, Serialize};

use super::CandidateMovie;

/// Request body for `POST /filter/streaming`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingFilterRequest {
    pub platforms: Option<Vec<String>>,
    pub region: Option<String>,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub page: Option<u32>,
    pub target_count: Option<usize>,
}

/// Platform-filtered discovery results, possibly served from cache
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StreamingFilterResponse {
    pub success: bool,
    pub cached: bool,
    pub data: Vec<CandidateMovie>,
    pub count: usize,
    pub page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_results: Option<u64>,
    pub has_more: bool,
    #[serde(rename = "query_info", default, skip_serializing_if = "Option::is_none")]
    pub query_info: Option<QueryInfo>,
}

/// Echo of how a fresh streaming filter request was resolved
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryInfo {
    pub platforms: Vec<String>,
    pub region: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub provider_ids: Vec<u32>,
    pub pagination: Pagination,
}

/// Catalog paging position of a fresh discovery page
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_results: u64,
    /// Whether the catalog has pages beyond this one
    pub has_more: bool,
}

impl Pagination {
    pub fn new(current_page: u32, total_pages: u32, total_results: u64) -> Self {
        Self {
            current_page,
            total_pages,
            total_results,
            has_more: current_page < total_pages,
        }
    }
}


/// A streaming platform known to the resolver
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Platform {
    pub id: String,
    pub name: String,
    pub provider_id: u32,
}
