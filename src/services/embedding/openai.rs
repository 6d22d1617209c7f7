//! OpenAI embeddings API provider
//!
//! API Flow: `POST {base}/v1/embeddings` with `{ model, input }` and a bearer
//! token; the first `data[].embedding` of the response is the vector.
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::{AppError, AppResult},
    models::EmbeddingVector,
    services::embedding::EmbeddingProvider,
};

#[derive(Clone)]
pub struct OpenAiEmbeddingProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

impl OpenAiEmbeddingProvider {
    pub fn new(
        api_key: String,
        api_url: String,
        model: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            model,
        })
    }

    fn parse_response(response: EmbeddingResponse) -> AppResult<EmbeddingVector> {
        response
            .data
            .into_iter()
            .min_by_key(|d| d.index)
            .map(|d| EmbeddingVector::from(d.embedding))
            .ok_or_else(|| {
                AppError::ProviderCallFailed("Embedding response contained no data".to_string())
            })
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    async fn embed(&self, text: &str) -> AppResult<EmbeddingVector> {
        let url = format!("{}/v1/embeddings", self.api_url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "input": text,
            }))
            .send()
            .await
            .map_err(|e| {
                AppError::ProviderCallFailed(format!(
                    "Embedding request failed: {}",
                    e.without_url()
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = status.as_u16(),
                body = %body,
                provider = "openai",
                "Embedding API returned an error status"
            );
            return Err(AppError::ProviderCallFailed(format!(
                "OpenAI API returned status {}",
                status
            )));
        }

        let parsed: EmbeddingResponse = response.json().await.map_err(|e| {
            AppError::ProviderCallFailed(format!(
                "Failed to parse embedding response: {}",
                e.without_url()
            ))
        })?;
        let vector = Self::parse_response(parsed)?;

        tracing::debug!(
            model = %self.model,
            chars = text.chars().count(),
            dimensions = vector.len(),
            provider = "openai",
            "Embedding computed"
        );

        Ok(vector)
    }
}
