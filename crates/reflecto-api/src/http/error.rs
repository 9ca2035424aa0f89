//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use reflecto_types::error::StorageError;

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// No session blob exists for the requested id.
    SessionNotFound,
    /// Validation error.
    Validation(String),
    /// Blob store failure.
    Storage(StorageError),
    /// Generic internal error.
    Internal(String),
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        AppError::Storage(e)
    }
}

impl AppError {
    fn status_code_and_message(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::SessionNotFound => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                "Session not found".to_string(),
            ),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Storage(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                e.to_string(),
            ),
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.status_code_and_message();
        let body = ApiResponse::error(code, &message, Uuid::now_v7().to_string());

        // The envelope serializes with a 200 status on its own; the tuple
        // overrides it with the mapped error status.
        (status, body).into_response()
    }
}
