//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use logical_perms::PermsError;
use serde::Serialize;
use tracing::error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    InvalidInput(String),
    NotFound(String),
    PermissionError(String),
    InternalError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match self {
            ApiError::InvalidInput(msg) => (
                StatusCode::BAD_REQUEST,
                "Invalid input".to_string(),
                Some(msg),
            ),
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "Not found".to_string(),
                Some(msg),
            ),
            ApiError::PermissionError(msg) => {
                error!("Permission evaluation failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Permission evaluation failed".to_string(),
                    Some(msg),
                )
            }
            ApiError::InternalError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                Some(msg),
            ),
        };

        let body = Json(ErrorResponse {
            error: error_message,
            details,
        });

        (status, body).into_response()
    }
}

impl From<PermsError> for ApiError {
    fn from(err: PermsError) -> Self {
        ApiError::PermissionError(err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}
