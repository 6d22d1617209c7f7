use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use cinematch_api::{
    api::{create_router, AppState},
    cache::CacheService,
    error::{AppError, AppResult},
    models::{CandidateMovie, DiscoverPage, EmbeddingVector, Keyword},
    services::{
        DiscoverFilters, Embedder, EmbeddingProvider, MovieCatalog, StaticPlatformResolver,
    },
};

/// In-memory catalog serving the same small set for every call
#[derive(Default)]
struct FakeCatalog {
    discover_calls: AtomicUsize,
}

fn sample_movies() -> Vec<CandidateMovie> {
    vec![
        CandidateMovie::new(808, "Shrek")
            .with_release_date("2001-05-18")
            .with_overview("An ogre's swamp is overrun by fairy tale creatures.")
            .with_vote_average(7.7),
        CandidateMovie::new(603, "The Matrix")
            .with_release_date("1999-03-31")
            .with_overview("A hacker learns the world is a simulation.")
            .with_vote_average(8.2),
    ]
}

#[async_trait::async_trait]
impl MovieCatalog for FakeCatalog {
    async fn search_by_text(&self, _query: &str, _page: u32) -> AppResult<Vec<CandidateMovie>> {
        Ok(sample_movies())
    }

    async fn discover(&self, _filters: &DiscoverFilters, _page: u32) -> AppResult<DiscoverPage> {
        self.discover_calls.fetch_add(1, Ordering::SeqCst);
        Ok(DiscoverPage {
            results: sample_movies(),
            total_pages: 3,
            total_results: 6,
        })
    }

    async fn search_keyword(&self, _token: &str) -> AppResult<Vec<Keyword>> {
        Ok(Vec::new())
    }
}

/// Scores text by how often it mentions ogres
struct OgreEmbedder;

#[async_trait::async_trait]
impl EmbeddingProvider for OgreEmbedder {
    async fn embed(&self, text: &str) -> AppResult<EmbeddingVector> {
        let ogres = text.to_lowercase().matches("ogre").count() as f32;
        Ok(vec![ogres, 1.0].into())
    }
}

struct FailingEmbedder;

#[async_trait::async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> AppResult<EmbeddingVector> {
        Err(AppError::ProviderCallFailed("provider timed out".to_string()))
    }
}

fn create_test_app(embedder: Embedder, environment: &str) -> (Router, Arc<FakeCatalog>) {
    let catalog = Arc::new(FakeCatalog::default());
    let caches = Arc::new(CacheService::new(
        Duration::from_secs(60),
        Duration::from_secs(60),
    ));
    let state = AppState::new(
        catalog.clone(),
        embedder,
        Arc::new(StaticPlatformResolver::new()),
        caches,
        environment,
    );
    (create_router(state), catalog)
}

fn unconfigured_app() -> Router {
    create_test_app(Embedder::Unconfigured, "development").0
}

fn configured_app() -> (Router, Arc<FakeCatalog>) {
    create_test_app(Embedder::Configured(Arc::new(OgreEmbedder)), "development")
}

async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_check() {
    let router = unconfigured_app();
    let (status, body) = send(&router, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["embedding_configured"], false);
    assert_eq!(body["environment"], "development");
    assert_eq!(body["cache_stats"]["query_vectors"], 0);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_semantic_search_unconfigured_falls_back() {
    let router = unconfigured_app();
    let (status, body) = send(
        &router,
        "POST",
        "/semantic/search",
        Some(json!({ "description": "green ogre in a swamp", "maxPages": 3 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["fallback"], true);
    assert_eq!(body["reason"], "embedding not configured");
    assert_eq!(body["count"], 2);
    for result in body["results"].as_array().unwrap() {
        assert!(result["similarity"].is_null());
    }
}

#[tokio::test]
async fn test_semantic_search_ranks_with_embeddings() {
    let (router, _) = configured_app();
    let (status, body) = send(
        &router,
        "POST",
        "/semantic/search",
        Some(json!({ "description": "a grumpy ogre", "yearFrom": 1990, "yearTo": 2010 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fallback"], false);
    assert!(body.get("reason").is_none());
    assert_eq!(body["count"], 2);
    assert_eq!(body["results"][0]["id"], 808);
    assert!(body["results"][0]["similarity"].is_number());

    let (_, health) = send(&router, "GET", "/health", None).await;
    assert_eq!(health["cache_stats"]["query_vectors"], 1);
    assert_eq!(health["cache_stats"]["movie_vectors"], 2);
}

#[tokio::test]
async fn test_semantic_search_provider_failure_falls_back() {
    let (router, _) = create_test_app(
        Embedder::Configured(Arc::new(FailingEmbedder)),
        "development",
    );
    let (status, body) = send(
        &router,
        "POST",
        "/semantic/search",
        Some(json!({ "description": "space heist" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fallback"], true);
    assert!(body["reason"].as_str().unwrap().contains("provider timed out"));
}

#[tokio::test]
async fn test_semantic_search_rejects_short_or_missing_description() {
    let router = unconfigured_app();

    let (status, body) = send(
        &router,
        "POST",
        "/semantic/search",
        Some(json!({ "description": " ab " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = send(&router, "POST", "/semantic/search", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_platform_search_unconfigured_is_unavailable() {
    let router = unconfigured_app();
    let (status, body) = send(
        &router,
        "POST",
        "/semantic/streaming",
        Some(json!({ "description": "space heist", "platforms": ["netflix"] })),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_platform_search_rejects_empty_platforms() {
    let (router, catalog) = configured_app();
    let (status, _) = send(
        &router,
        "POST",
        "/semantic/streaming",
        Some(json!({ "description": "space heist", "platforms": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(catalog.discover_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_platform_search_ranks_single_discovery() {
    let (router, catalog) = configured_app();
    let (status, body) = send(
        &router,
        "POST",
        "/semantic/streaming",
        Some(json!({ "description": "an ogre story", "platforms": ["netflix"], "region": "GB" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fallback"], false);
    assert_eq!(body["results"][0]["id"], 808);
    assert_eq!(catalog.discover_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_filter_streaming_caches_results() {
    let (router, catalog) = configured_app();
    let request = json!({ "platforms": ["netflix", "hulu"], "type": "movie", "targetCount": 2 });

    let (status, first) = send(&router, "POST", "/filter/streaming", Some(request.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["cached"], false);
    assert_eq!(first["totalPages"], 3);
    assert_eq!(first["hasMore"], true);
    assert_eq!(first["query_info"]["provider_ids"], json!([8, 15]));
    assert_eq!(first["query_info"]["type"], "movie");
    assert_eq!(
        first["query_info"]["pagination"],
        json!({ "current_page": 1, "total_pages": 3, "total_results": 6, "has_more": true })
    );
    assert!(first.get("queryInfo").is_none());

    let (status, second) = send(&router, "POST", "/filter/streaming", Some(request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["cached"], true);
    assert_eq!(second["count"], 2);
    assert!(second.get("query_info").is_none());
    assert_eq!(catalog.discover_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_filter_streaming_unknown_platform_lists_available() {
    let (router, catalog) = configured_app();
    let (status, body) = send(
        &router,
        "POST",
        "/filter/streaming",
        Some(json!({ "platforms": ["betamax"] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "No valid platforms found. Check platform names.");
    let available = body["available_platforms"].as_array().unwrap();
    assert_eq!(available.len(), 9);
    assert!(available.contains(&json!("netflix")));
    assert_eq!(catalog.discover_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_mistyped_body_uses_error_envelope() {
    let router = unconfigured_app();
    let (status, body) = send(
        &router,
        "POST",
        "/semantic/search",
        Some(json!({ "description": "heist crew", "maxPages": "3" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_malformed_json_uses_error_envelope() {
    let router = unconfigured_app();
    let request = Request::builder()
        .method("POST")
        .uri("/filter/streaming")
        .header("Content-Type", "application/json")
        .body(Body::from("{\"platforms\": [\"netflix\""))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_filter_streaming_rejects_bad_type() {
    let router = unconfigured_app();
    let (status, body) = send(
        &router,
        "POST",
        "/filter/streaming",
        Some(json!({ "platforms": ["netflix"], "type": "podcast" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("type"));
}

#[tokio::test]
async fn test_list_platforms() {
    let router = unconfigured_app();
    let (status, body) = send(&router, "GET", "/platforms", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 9);
    assert_eq!(body["platforms"][0]["id"], "netflix");
    assert_eq!(body["platforms"][0]["provider_id"], 8);
}

#[tokio::test]
async fn test_clear_cache() {
    let (router, _) = configured_app();
    send(
        &router,
        "POST",
        "/semantic/search",
        Some(json!({ "description": "a grumpy ogre" })),
    )
    .await;

    let (status, body) = send(&router, "DELETE", "/cache", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, health) = send(&router, "GET", "/health", None).await;
    assert_eq!(health["cache_stats"]["query_vectors"], 0);
    assert_eq!(health["cache_stats"]["movie_vectors"], 0);
}

#[tokio::test]
async fn test_clear_cache_forbidden_in_production() {
    let (router, _) = create_test_app(Embedder::Unconfigured, "production");
    let (status, body) = send(&router, "DELETE", "/cache", None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_request_id_is_echoed_or_generated() {
    let router = unconfigured_app();

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "frontend-42")
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "frontend-42");

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}
