use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Semantic search
        .route("/semantic/search", post(handlers::semantic_search))
        .route("/semantic/streaming", post(handlers::semantic_streaming))
        // Platform filtering
        .route("/filter/streaming", post(handlers::filter_streaming))
        .route("/platforms", get(handlers::list_platforms))
        // Maintenance
        .route("/cache", delete(handlers::clear_cache))
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(CorsLayer::permissive())
        // Outermost, so the trace span already sees the request id
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
