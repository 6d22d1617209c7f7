use std::sync::Arc;

use crate::{
    cache::CacheService,
    config::Config,
    error::AppResult,
    services::{
        Embedder, MovieCatalog, OpenAiEmbeddingProvider, PlatformResolver, SemanticSearchService,
        StaticPlatformResolver, StreamingFilterService, TmdbCatalog, VectorCache,
    },
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub search: SemanticSearchService,
    pub streaming: StreamingFilterService,
    pub caches: Arc<CacheService>,
    pub platforms: Arc<dyn PlatformResolver>,
    pub environment: String,
}

impl AppState {
    /// Wires the services around explicitly provided collaborators
    pub fn new(
        catalog: Arc<dyn MovieCatalog>,
        embedder: Embedder,
        platforms: Arc<dyn PlatformResolver>,
        caches: Arc<CacheService>,
        environment: impl Into<String>,
    ) -> Self {
        let vectors = VectorCache::new(embedder, caches.clone());
        Self {
            search: SemanticSearchService::new(catalog.clone(), vectors, platforms.clone()),
            streaming: StreamingFilterService::new(catalog, caches.clone(), platforms.clone()),
            caches,
            platforms,
            environment: environment.into(),
        }
    }

    /// Builds production state: TMDB catalog, OpenAI embeddings when a key is set
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let catalog = TmdbCatalog::new(
            config.tmdb_api_key.clone(),
            config.tmdb_base_url.clone(),
            config.catalog_timeout(),
        )?;

        let embedder = match config.embedding_api_key() {
            Some(api_key) => {
                let provider = OpenAiEmbeddingProvider::new(
                    api_key.to_string(),
                    config.openai_base_url.clone(),
                    config.embedding_model.clone(),
                    config.embedding_timeout(),
                )?;
                tracing::info!(model = %config.embedding_model, "Embedding provider configured");
                Embedder::Configured(Arc::new(provider))
            }
            None => {
                tracing::warn!(
                    "No embedding API key set; semantic search will serve fallback results"
                );
                Embedder::Unconfigured
            }
        };

        let caches = Arc::new(CacheService::new(config.vector_ttl(), config.query_ttl()));

        Ok(Self::new(
            Arc::new(catalog),
            embedder,
            Arc::new(StaticPlatformResolver::new()),
            caches,
            config.environment.clone(),
        ))
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}
