use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use colloquy_core::ChatError;
use colloquy_persist::PersistError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Chat(ChatError::NotFound(_)) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Chat(ChatError::Provider(ref e)) => {
                tracing::error!("Provider error: {}", e);
                (StatusCode::BAD_GATEWAY, "Generation failed".to_string())
            }
            ApiError::Chat(ChatError::Storage(ref e)) | ApiError::Persist(ref e) => {
                tracing::error!("Storage error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
