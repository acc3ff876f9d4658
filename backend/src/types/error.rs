//! Universal error handling for the API

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use registration_storage::user::UserStorageError;
use serde::{Deserialize, Serialize};

use crate::media_storage::BucketError;

/// API error response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Human-readable error message
    pub detail: String,
}

/// Application error type that wraps the API error response
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    inner: ApiErrorResponse,
}

impl AppError {
    /// Create a new application error
    #[must_use]
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            inner: ApiErrorResponse {
                detail: detail.into(),
            },
        }
    }

    /// Client error rejected before any side effect
    #[must_use]
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    /// Required form field absent from the request
    #[must_use]
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("Missing required field: {field}"),
        )
    }

    /// Opaque server error carrying the underlying message
    #[must_use]
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, detail)
    }

    /// HTTP status of the error
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Message returned to the client
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.inner.detail
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error based on status code
        match self.status.as_u16() {
            400..=499 => tracing::warn!("Client error: {} - {}", self.status, self.inner.detail),
            500..=599 => tracing::error!("Server error: {} - {}", self.status, self.inner.detail),
            _ => {}
        }

        (self.status, Json(self.inner)).into_response()
    }
}

/// Malformed or oversized multipart bodies are rejected with the status axum assigns
impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        Self::new(err.status(), err.body_text())
    }
}

/// Requests that are not `multipart/form-data` never reach the handler body
impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<BucketError> for AppError {
    fn from(err: BucketError) -> Self {
        Self::internal(err.to_string())
    }
}

impl From<UserStorageError> for AppError {
    fn from(err: UserStorageError) -> Self {
        Self::internal(err.to_string())
    }
}
