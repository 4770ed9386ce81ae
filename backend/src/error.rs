//! Error type for API handlers.
//!
//! Implements `IntoResponse` so handlers can use `?` and still answer with a
//! JSON [`ErrorResponse`] and a matching status code.

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::api::ErrorResponse;
use shared::ChunkError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed query string
    #[error("Invalid query: {0}")]
    Query(#[from] QueryRejection),

    /// Body is not a rendered event document
    #[error(transparent)]
    Document(#[from] ChunkError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Query(e) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_details("Invalid query parameters", e.body_text()),
            ),
            ApiError::Document(e) => {
                tracing::warn!("Rejected event document: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::with_details("Invalid event document", e.to_string()),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
