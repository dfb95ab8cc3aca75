//! server::error
//!
//! HTTP error envelope.
//!
//! Every failure leaving the service renders as a JSON body of the shape
//! `{"error": "..."}` with the status the taxonomy assigns. Messages may
//! quote the backing store's own error text for diagnosability; they never
//! contain credentials.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::store::StoreError;

/// Request-level errors, one variant per response status.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// Missing or mismatched bearer token.
    Unauthorized,
    /// The request is malformed (missing body field, target not a file).
    BadRequest(String),
    /// The document or directory does not exist.
    NotFound(String),
    /// Backing-store, transport, or configuration failure.
    Internal(String),
}

/// JSON error body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized".to_string()),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound(err.to_string()),
            StoreError::NotAFile(_) => ApiError::BadRequest(err.to_string()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}
