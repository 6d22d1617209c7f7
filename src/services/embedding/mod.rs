//! Embedding provider abstraction
//!
//! The provider is optional: a deployment without credentials still serves
//! searches through the fallback path. That optionality is carried by the
//! [`Embedder`] value rather than by a nullable client.
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::EmbeddingVector,
    services::truncate_chars,
};

#[cfg(test)]
use mockall::automock;

pub mod openai;

pub use openai::OpenAiEmbeddingProvider;

/// Maximum characters submitted to the provider per call
pub const MAX_EMBED_CHARS: usize = 8000;

/// Trait for remote text-embedding services
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed one text; a single failed call is returned as-is, never retried
    async fn embed(&self, text: &str) -> AppResult<EmbeddingVector>;
}

/// Embedding capability as seen by the pipeline
#[derive(Clone)]
pub enum Embedder {
    Configured(Arc<dyn EmbeddingProvider>),
    Unconfigured,
}

impl Embedder {
    pub fn is_configured(&self) -> bool {
        matches!(self, Embedder::Configured(_))
    }

    /// Embeds `text`, truncated to [`MAX_EMBED_CHARS`]
    pub async fn embed(&self, text: &str) -> AppResult<EmbeddingVector> {
        match self {
            Embedder::Configured(provider) => {
                provider.embed(truncate_chars(text, MAX_EMBED_CHARS)).await
            }
            Embedder::Unconfigured => Err(AppError::ProviderUnconfigured),
        }
    }
}

impl std::fmt::Debug for Embedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Embedder::Configured(_) => f.write_str("Embedder::Configured"),
            Embedder::Unconfigured => f.write_str("Embedder::Unconfigured"),
        }
    }
}
