//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::remote::error::ServiceError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
///
/// Lookup failures arrive as `Service(ServiceError::NotFound)` from the
/// registry; there is no separate handler-level variant for them.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request (validation error)
    BadRequest(String),
    /// Internal server error
    Internal(String),
    /// Error from the service layer / remote boundary
    Service(ServiceError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Service(e) => {
                let msg = e.to_string();
                match e {
                    ServiceError::InvalidRange { .. } => {
                        (StatusCode::BAD_REQUEST, ApiError::new("INVALID_RANGE", msg))
                    }
                    ServiceError::NotFound { .. } => {
                        (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg))
                    }
                    ServiceError::Authentication { .. } => (
                        StatusCode::BAD_GATEWAY,
                        ApiError::new("AUTHENTICATION_ERROR", msg),
                    ),
                    ServiceError::ServiceUnavailable { .. } => (
                        StatusCode::BAD_GATEWAY,
                        ApiError::new("SERVICE_UNAVAILABLE", msg),
                    ),
                    ServiceError::EmptySeries { .. } => {
                        // Handlers turn this into a "no data" payload; reaching
                        // here means a handler forgot to.
                        (StatusCode::NOT_FOUND, ApiError::new("EMPTY_SERIES", msg))
                    }
                    ServiceError::Configuration { .. } | ServiceError::Internal { .. } => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ApiError::new("INTERNAL_ERROR", msg),
                    ),
                }
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        AppError::Service(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
