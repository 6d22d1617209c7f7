pub mod aggregate;
pub mod catalog;
pub mod embedding;
pub mod platforms;
pub mod ranking;
pub mod retrieval;
pub mod semantic_search;
pub mod streaming_filter;
pub mod vectors;

pub use catalog::{DiscoverFilters, MovieCatalog, SortOrder, TmdbCatalog};
pub use embedding::{Embedder, EmbeddingProvider, OpenAiEmbeddingProvider};
pub use platforms::{PlatformResolver, StaticPlatformResolver};
pub use retrieval::CatalogRetriever;
pub use semantic_search::SemanticSearchService;
pub use streaming_filter::StreamingFilterService;
pub use vectors::VectorCache;

/// Truncates `text` to at most `max_chars` characters, on a char boundary
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 5), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("", 2), "");
    }
}
