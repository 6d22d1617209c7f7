use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    cache::CacheStats,
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{
        Platform, PlatformSearchRequest, SemanticSearchRequest, SemanticSearchResponse,
        StreamingFilterRequest, StreamingFilterResponse,
    },
};

use super::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub cache_stats: CacheStats,
    pub embedding_configured: bool,
    pub environment: String,
}

#[derive(Debug, Serialize)]
pub struct PlatformsResponse {
    pub success: bool,
    pub platforms: Vec<Platform>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ClearCacheResponse {
    pub success: bool,
    pub message: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        cache_stats: state.caches.stats(),
        embedding_configured: state.search.embedding_configured(),
        environment: state.environment.clone(),
    })
}

/// Free-text semantic search
pub async fn semantic_search(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<SemanticSearchRequest>, JsonRejection>,
) -> AppResult<Json<SemanticSearchResponse>> {
    let Json(request) = payload?;
    tracing::info!(request_id = %request_id, "Semantic search request");
    let response = state.search.search(request).await?;
    Ok(Json(response))
}

/// Semantic search restricted to streaming platforms
pub async fn semantic_streaming(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<PlatformSearchRequest>, JsonRejection>,
) -> AppResult<Json<SemanticSearchResponse>> {
    let Json(request) = payload?;
    tracing::info!(
        request_id = %request_id,
        platforms = ?request.platforms,
        "Platform semantic search request"
    );
    let response = state.search.search_platforms(request).await?;
    Ok(Json(response))
}

/// Platform-filtered discovery
pub async fn filter_streaming(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<StreamingFilterRequest>, JsonRejection>,
) -> AppResult<Json<StreamingFilterResponse>> {
    let Json(request) = payload?;
    tracing::info!(
        request_id = %request_id,
        platforms = ?request.platforms,
        page = ?request.page,
        "Streaming filter request"
    );
    let response = state.streaming.filter(request).await?;
    Ok(Json(response))
}

pub async fn list_platforms(State(state): State<AppState>) -> Json<PlatformsResponse> {
    let platforms = state.platforms.platforms();
    Json(PlatformsResponse {
        success: true,
        count: platforms.len(),
        platforms,
    })
}

/// Empties every cache; unavailable in production
pub async fn clear_cache(State(state): State<AppState>) -> AppResult<Json<ClearCacheResponse>> {
    if state.is_production() {
        return Err(AppError::Forbidden(
            "Cache clearing not allowed in production".to_string(),
        ));
    }

    state.caches.clear();
    Ok(Json(ClearCacheResponse {
        success: true,
        message: "Cache cleared",
        timestamp: Utc::now(),
    }))
}
