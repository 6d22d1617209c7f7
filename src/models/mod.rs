mod movie;
mod search;
mod streaming;

pub use movie::{CandidateMovie, ContentType, DiscoverPage, Keyword, MovieId};
pub use search::{
    clamp_max_pages, PlatformQuery, PlatformSearchRequest, RankedResult, SemanticQuery,
    SemanticSearchRequest, SemanticSearchResponse, DEFAULT_LANGUAGE, DEFAULT_REGION,
};
pub use streaming::{
    Pagination, Platform, QueryInfo, StreamingFilterRequest, StreamingFilterResponse,
};

use std::sync::Arc;

/// An embedding produced by one model; only vectors from the same model compare
pub type EmbeddingVector = Arc<[f32]>;
