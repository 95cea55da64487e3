//! API error types mapped to HTTP status codes.
//!
//! Every error leaving a handler is an [`ApiError`], which renders as a JSON
//! body of the form `{"error": "<message>"}` with the matching status code.

use askstack_core::AppError;
use askstack_retrieval::SearchError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Handler-level error with an HTTP status mapping.
///
/// - `BadRequest` → 400
/// - `ServiceUnavailable` → 503
/// - `Internal` → 500
#[derive(Debug)]
pub enum ApiError {
    /// The request itself is invalid (400).
    BadRequest(String),
    /// An upstream dependency did not respond usefully (503).
    ServiceUnavailable(String),
    /// Unexpected server-side failure (500).
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
