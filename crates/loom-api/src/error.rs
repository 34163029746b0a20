use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use loom_chat::ChatError;
use loom_llm::LlmError;
use loom_persist::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("message content is required")]
    EmptyContent,

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("thread not found: {0}")]
    ThreadNotFound(String),

    #[error("completion failed: {0}")]
    Upstream(#[from] LlmError),

    #[error("storage error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidId(id) => ApiError::InvalidId(id),
            StoreError::ThreadNotFound(id) => ApiError::ThreadNotFound(id),
            other => ApiError::Store(other),
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::EmptyContent => ApiError::EmptyContent,
            ChatError::Store(e) => e.into(),
            ChatError::Completion(e) => ApiError::Upstream(e),
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::EmptyContent | ApiError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ApiError::ThreadNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::EmptyContent | ApiError::InvalidId(_) => "validation_error",
            ApiError::ThreadNotFound(_) => "not_found",
            ApiError::Upstream(_) => "upstream_error",
            ApiError::Store(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            // Store internals stay in the logs, not in the response.
            ApiError::Store(e) => {
                tracing::error!(error = %e, "storage failure");
                "storage error".to_string()
            }
            ApiError::Upstream(e) => {
                tracing::error!(error = %e, "completion failure");
                self.to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(json!({
            "error": {
                "code": self.error_code(),
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
