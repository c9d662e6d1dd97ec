//! Error types for remote compute operations.
//!
//! This module provides the error taxonomy shared by the whole crate, with
//! structured context for debugging and monitoring. Failures are surfaced to
//! the caller as-is; nothing in this crate retries automatically.

use std::fmt;

/// Result type for remote compute and service-layer operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Structured context for service errors.
///
/// Provides additional information about where and why an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "resolve_asset", "submit_aggregation")
    pub operation: Option<String>,
    /// The entity type involved (e.g., "layer", "pipeline", "scene")
    pub entity: Option<String>,
    /// The entity ID if applicable (asset path, pipeline fingerprint, ...)
    pub entity_id: Option<String>,
    /// Additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with an operation name.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    /// Set the entity type.
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Set the entity ID.
    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
        self
    }

    /// Set additional details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref entity) = self.entity {
            parts.push(format!("entity={}", entity));
        }
        if let Some(ref id) = self.entity_id {
            parts.push(format!("id={}", id));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Error type for remote compute and service-layer operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Credential or session setup with the remote service failed.
    /// Fatal for the process; no further remote interaction will succeed.
    #[error("Authentication error: {message} {context}")]
    Authentication {
        message: String,
        context: ErrorContext,
    },

    /// A remote call failed (network, timeout, quota, server error).
    /// Recoverable by repeating the user interaction; never retried here.
    #[error("Service unavailable: {message} {context}")]
    ServiceUnavailable {
        message: String,
        context: ErrorContext,
    },

    /// Requested entity (layer name, remote asset) was not found.
    #[error("Not found: {message} {context}")]
    NotFound {
        message: String,
        context: ErrorContext,
    },

    /// A user-supplied date range violates `start < end`.
    /// Recovered locally; no remote request is issued.
    #[error("Invalid date range: {message} {context}")]
    InvalidRange {
        message: String,
        context: ErrorContext,
    },

    /// A valid query produced zero observations.
    #[error("Empty series: {message} {context}")]
    EmptySeries {
        message: String,
        context: ErrorContext,
    },

    /// Configuration or initialization error.
    #[error("Configuration error: {message} {context}")]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    /// Internal/unexpected errors.
    #[error("Internal error: {message} {context}")]
    Internal {
        message: String,
        context: ErrorContext,
    },
}

impl ServiceError {
    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create an authentication error with full context.
    pub fn authentication_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Authentication {
            message: message.into(),
            context,
        }
    }

    /// Create a service-unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a service-unavailable error with context.
    pub fn unavailable_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
            context,
        }
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a not found error with context.
    pub fn not_found_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::NotFound {
            message: message.into(),
            context,
        }
    }

    /// Create an invalid-range error.
    pub fn invalid_range(message: impl Into<String>) -> Self {
        Self::InvalidRange {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create an empty-series error.
    pub fn empty_series(message: impl Into<String>) -> Self {
        Self::EmptySeries {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a configuration error with context.
    pub fn configuration_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Configuration {
            message: message.into(),
            context,
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create an internal error with context.
    pub fn internal_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Internal {
            message: message.into(),
            context,
        }
    }

    /// Get the error context.
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::Authentication { context, .. } => context,
            Self::ServiceUnavailable { context, .. } => context,
            Self::NotFound { context, .. } => context,
            Self::InvalidRange { context, .. } => context,
            Self::EmptySeries { context, .. } => context,
            Self::Configuration { context, .. } => context,
            Self::Internal { context, .. } => context,
        }
    }

    /// Add or update the operation in the error context.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        match &mut self {
            Self::Authentication { context, .. }
            | Self::ServiceUnavailable { context, .. }
            | Self::NotFound { context, .. }
            | Self::InvalidRange { context, .. }
            | Self::EmptySeries { context, .. }
            | Self::Configuration { context, .. }
            | Self::Internal { context, .. } => {
                context.operation = Some(operation.into());
            }
        }
        self
    }
}

impl From<String> for ServiceError {
    fn from(s: String) -> Self {
        ServiceError::internal(s)
    }
}

impl From<&str> for ServiceError {
    fn from(s: &str) -> Self {
        ServiceError::internal(s.to_string())
    }
}

#[cfg(feature = "ee-backend")]
impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        let context = if let Some(url) = err.url() {
            ErrorContext::default().with_details(format!("url={}", url))
        } else {
            ErrorContext::default()
        };

        if err.is_timeout() || err.is_connect() {
            return ServiceError::unavailable_with_context(err.to_string(), context);
        }

        match err.status() {
            Some(status) if status.as_u16() == 401 || status.as_u16() == 403 => {
                ServiceError::authentication_with_context(err.to_string(), context)
            }
            Some(status) if status.as_u16() == 404 => {
                ServiceError::not_found_with_context(err.to_string(), context)
            }
            _ => ServiceError::unavailable_with_context(err.to_string(), context),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_context_display() {
        let ctx = ErrorContext::new("submit_aggregation")
            .with_entity("pipeline")
            .with_entity_id("abcd1234")
            .with_details("quota exceeded");
        let rendered = format!("{}", ctx);
        assert!(rendered.contains("operation=submit_aggregation"));
        assert!(rendered.contains("entity=pipeline"));
        assert!(rendered.contains("id=abcd1234"));
        assert!(rendered.contains("details=quota exceeded"));
    }

    #[test]
    fn test_with_operation_updates_context() {
        let err = ServiceError::unavailable("connection refused").with_operation("resolve_asset");
        assert_eq!(err.context().operation.as_deref(), Some("resolve_asset"));
    }

    #[test]
    fn test_string_conversion_is_internal() {
        let err: ServiceError = "boom".into();
        assert!(matches!(err, ServiceError::Internal { .. }));
    }
}
