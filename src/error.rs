use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// None of the requested platform names resolved to a provider
    #[error("No valid platforms found. Check platform names.")]
    NoValidPlatforms { available_platforms: Vec<String> },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Embedding provider not configured")]
    ProviderUnconfigured,

    #[error("Embedding provider call failed: {0}")]
    ProviderCallFailed(String),

    #[error("Catalog call failed: {0}")]
    CatalogCallFailed(String),

    /// The last-resort path failed after the primary pipeline gave up
    #[error("Fallback failed after '{reason}': {message}")]
    FallbackFailed { reason: String, message: String },

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NoValidPlatforms { .. } => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::ProviderUnconfigured => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Semantic search unavailable: embedding provider not configured".to_string(),
            ),
            AppError::ProviderCallFailed(_) | AppError::CatalogCallFailed(_) => {
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            AppError::FallbackFailed { .. } => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let mut body = json!({
            "success": false,
            "error": message
        });
        if let AppError::NoValidPlatforms {
            available_platforms,
        } = self
        {
            body["available_platforms"] = json!(available_platforms);
        }

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
