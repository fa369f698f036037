use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::document::DecodeError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upload error: {0}")]
    Upload(#[from] MultipartError),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("File parse error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Upload(e) => {
                tracing::warn!("Multipart upload rejected: {e}");
                (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    "File upload error".to_string(),
                )
            }
            AppError::UnsupportedFileType(name) => (
                StatusCode::BAD_REQUEST,
                "UNSUPPORTED_FILE_TYPE",
                format!("Unsupported file type: {name}"),
            ),
            AppError::Decode(e) => {
                tracing::error!("Decode error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DECODE_ERROR",
                    format!("File parse error: {e}"),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
