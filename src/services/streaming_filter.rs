use std::sync::Arc;

use crate::{
    cache::{CacheKey, CacheService},
    error::{AppError, AppResult},
    models::{
        ContentType, Pagination, QueryInfo, StreamingFilterRequest, StreamingFilterResponse,
        DEFAULT_REGION,
    },
    services::{
        catalog::{DiscoverFilters, MovieCatalog},
        platforms::PlatformResolver,
    },
};

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_TARGET_COUNT: usize = 20;
const MIN_VOTE_COUNT: u32 = 10;
const MIN_VOTE_AVERAGE: f64 = 5.0;

/// Platform-filtered discovery backed by the streaming result cache
#[derive(Clone)]
pub struct StreamingFilterService {
    catalog: Arc<dyn MovieCatalog>,
    caches: Arc<CacheService>,
    platforms: Arc<dyn PlatformResolver>,
}

impl StreamingFilterService {
    pub fn new(
        catalog: Arc<dyn MovieCatalog>,
        caches: Arc<CacheService>,
        platforms: Arc<dyn PlatformResolver>,
    ) -> Self {
        Self {
            catalog,
            caches,
            platforms,
        }
    }

    /// Returns one discovery page of titles on the requested platforms
    ///
    /// A cached page is served without touching the catalog. Catalog
    /// failures propagate; this path has no fallback.
    pub async fn filter(
        &self,
        request: StreamingFilterRequest,
    ) -> AppResult<StreamingFilterResponse> {
        let platforms = request.platforms.unwrap_or_default();
        if platforms.is_empty() {
            return Err(AppError::InvalidInput(
                "Invalid platforms parameter. Must be a non-empty array.".to_string(),
            ));
        }

        let content_type = match request.content_type.as_deref() {
            None => ContentType::Movie,
            Some(value) => ContentType::parse(value).ok_or_else(|| {
                AppError::InvalidInput(
                    "Invalid type parameter. Must be \"movie\" or \"tv\".".to_string(),
                )
            })?,
        };
        let region = request
            .region
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REGION.to_string());
        let page = request.page.unwrap_or(DEFAULT_PAGE).max(1);
        let target_count = request.target_count.unwrap_or(DEFAULT_TARGET_COUNT);

        let key = CacheKey::streaming_discover(&platforms, &region, content_type, page);
        if let Some(data) = self.caches.streaming_results().get(&key) {
            tracing::debug!(key = %key, "Serving cached streaming results");
            let count = data.len();
            return Ok(StreamingFilterResponse {
                success: true,
                cached: true,
                data,
                count,
                page,
                total_pages: None,
                total_results: None,
                has_more: count >= target_count,
                query_info: None,
            });
        }

        let provider_ids = self.platforms.provider_ids_for(&platforms, &region);
        if provider_ids.is_empty() {
            return Err(AppError::NoValidPlatforms {
                available_platforms: self.platforms.platform_ids(),
            });
        }

        let filters = DiscoverFilters {
            content_type,
            min_vote_count: Some(MIN_VOTE_COUNT),
            min_vote_average: Some(MIN_VOTE_AVERAGE),
            watch_providers: provider_ids.clone(),
            watch_region: Some(region.clone()),
            ..Default::default()
        };
        let discovered = self.catalog.discover(&filters, page).await?;

        self.caches
            .streaming_results()
            .set(key, discovered.results.clone());

        let count = discovered.results.len();
        tracing::info!(
            platforms = ?platforms,
            region = %region,
            content_type = %content_type,
            page = page,
            results = count,
            total_pages = discovered.total_pages,
            "Streaming filter completed"
        );

        Ok(StreamingFilterResponse {
            success: true,
            cached: false,
            data: discovered.results,
            count,
            page,
            total_pages: Some(discovered.total_pages),
            total_results: Some(discovered.total_results),
            has_more: page < discovered.total_pages && count >= target_count,
            query_info: Some(QueryInfo {
                platforms,
                region,
                content_type: content_type.to_string(),
                provider_ids,
                pagination: Pagination::new(
                    page,
                    discovered.total_pages,
                    discovered.total_results,
                ),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CandidateMovie, DiscoverPage};
    use crate::services::catalog::MockMovieCatalog;
    use crate::services::platforms::StaticPlatformResolver;
    use std::time::Duration;
    use tokio_test::assert_ok;

    fn service(catalog: MockMovieCatalog) -> (StreamingFilterService, Arc<CacheService>) {
        let caches = Arc::new(CacheService::new(
            Duration::from_secs(60),
            Duration::from_secs(60),
        ));
        let service = StreamingFilterService::new(
            Arc::new(catalog),
            caches.clone(),
            Arc::new(StaticPlatformResolver::new()),
        );
        (service, caches)
    }

    fn request(platforms: &[&str]) -> StreamingFilterRequest {
        StreamingFilterRequest {
            platforms: Some(platforms.iter().map(|p| p.to_string()).collect()),
            ..Default::default()
        }
    }

    fn discover_page(count: u64, total_pages: u32) -> DiscoverPage {
        DiscoverPage {
            results: (0..count)
                .map(|id| CandidateMovie::new(id, format!("Movie {}", id)))
                .collect(),
            total_pages,
            total_results: count * total_pages as u64,
        }
    }

    #[tokio::test]
    async fn test_validation() {
        let mut catalog = MockMovieCatalog::new();
        catalog.expect_discover().never();
        let (service, _) = service(catalog);

        let empty = service.filter(request(&[])).await;
        assert!(matches!(empty, Err(AppError::InvalidInput(_))));

        let missing = service.filter(StreamingFilterRequest::default()).await;
        assert!(matches!(missing, Err(AppError::InvalidInput(_))));

        let bad_type = service
            .filter(StreamingFilterRequest {
                content_type: Some("podcast".to_string()),
                ..request(&["netflix"])
            })
            .await;
        assert!(matches!(bad_type, Err(AppError::InvalidInput(_))));

        match service.filter(request(&["betamax"])).await {
            Err(AppError::NoValidPlatforms {
                available_platforms,
            }) => {
                assert_eq!(available_platforms.len(), 9);
                assert!(available_platforms.contains(&"netflix".to_string()));
            }
            other => panic!("expected NoValidPlatforms, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fresh_results_are_cached() {
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_discover()
            .withf(|filters, page| {
                filters.content_type == ContentType::Tv
                    && filters.watch_providers == vec![8, 15]
                    && filters.watch_region.as_deref() == Some("US")
                    && filters.min_vote_count == Some(10)
                    && filters.min_vote_average == Some(5.0)
                    && *page == 2
            })
            .times(1)
            .returning(|_, _| Ok(discover_page(20, 4)));
        let (service, caches) = service(catalog);

        let response = assert_ok!(
            service
                .filter(StreamingFilterRequest {
                    content_type: Some("tv".to_string()),
                    page: Some(2),
                    ..request(&["netflix", "hulu"])
                })
                .await
        );

        assert!(!response.cached);
        assert_eq!(response.count, 20);
        assert_eq!(response.total_pages, Some(4));
        assert!(response.has_more);
        let info = response.query_info.unwrap();
        assert_eq!(info.provider_ids, vec![8, 15]);
        assert_eq!(info.content_type, "tv");
        assert_eq!(info.pagination, Pagination::new(2, 4, 80));
        assert_eq!(caches.stats().streaming_results, 1);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_catalog() {
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_discover()
            .times(1)
            .returning(|_, _| Ok(discover_page(12, 1)));
        let (service, _) = service(catalog);

        let first = assert_ok!(service.filter(request(&["netflix", "hulu"])).await);
        assert!(!first.cached);
        assert!(!first.has_more);
        assert!(!first.query_info.as_ref().unwrap().pagination.has_more);

        // Platform order does not change the cache key
        let second = assert_ok!(
            service
                .filter(StreamingFilterRequest {
                    target_count: Some(10),
                    ..request(&["hulu", "netflix"])
                })
                .await
        );
        assert!(second.cached);
        assert_eq!(second.count, 12);
        assert_eq!(second.data, first.data);
        assert!(second.has_more);
        assert!(second.query_info.is_none());
    }

    #[tokio::test]
    async fn test_catalog_failure_propagates() {
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_discover()
            .returning(|_, _| Err(AppError::CatalogCallFailed("timed out".to_string())));
        let (service, caches) = service(catalog);

        let result = service.filter(request(&["netflix"])).await;
        assert!(matches!(result, Err(AppError::CatalogCallFailed(_))));
        assert_eq!(caches.stats().streaming_results, 0);
    }
}
