use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_base_url")]
    pub tmdb_base_url: String,

    /// OpenAI API key; semantic ranking is disabled without it
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// Alternate name for the OpenAI key
    #[serde(default)]
    pub openai_api_token: Option<String>,

    /// OpenAI API base URL
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Per-call timeout for catalog requests, in seconds
    #[serde(default = "default_timeout_secs")]
    pub catalog_timeout_secs: u64,

    /// Per-call timeout for embedding requests, in seconds
    #[serde(default = "default_timeout_secs")]
    pub embedding_timeout_secs: u64,

    /// TTL for query and movie vectors, in seconds
    #[serde(default = "default_vector_cache_ttl")]
    pub vector_cache_ttl: u64,

    /// TTL for platform-filtered discovery results, in seconds
    #[serde(default = "default_query_cache_ttl")]
    pub query_cache_ttl: u64,

    /// Deployment environment name
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_vector_cache_ttl() -> u64 {
    86400 // 24 hours
}

fn default_query_cache_ttl() -> u64 {
    600 // 10 minutes
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// The embedding API key, if one is present and non-blank
    pub fn embedding_api_key(&self) -> Option<&str> {
        [&self.openai_api_key, &self.openai_api_token]
            .into_iter()
            .flatten()
            .map(|key| key.trim())
            .find(|key| !key.is_empty())
    }

    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog_timeout_secs)
    }

    pub fn embedding_timeout(&self) -> Duration {
        Duration::from_secs(self.embedding_timeout_secs)
    }

    pub fn vector_ttl(&self) -> Duration {
        Duration::from_secs(self.vector_cache_ttl)
    }

    pub fn query_ttl(&self) -> Duration {
        Duration::from_secs(self.query_cache_ttl)
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}
