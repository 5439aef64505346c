//! API-specific error types

use byte_common::{ErrorClassification, ErrorSeverity};
use byte_domain::DomainError;
use thiserror::Error;

use crate::http::ClientError;

/// Categories of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// 404 from the service
    NotFound,
    /// Other terminal 4xx or unexpected status
    Client,
    /// Retries exhausted; the service is treated as unavailable
    Unavailable,
    /// Response body did not match the expected schema
    Decode,
    /// Request rejected locally before sending
    Validation,
    /// Unrecognized transport failure or client misconfiguration
    Transport,
}

/// Typed client errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Failed to decode {operation} response: {message}")]
    Decode { operation: String, message: String },

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl ApiError {
    /// Coarse category for callers that branch on the failure.
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Client(err) if err.is_not_found() => ApiErrorCategory::NotFound,
            Self::Client(err) if err.is_service_unavailable() => ApiErrorCategory::Unavailable,
            Self::Client(ClientError::Status { .. }) => ApiErrorCategory::Client,
            Self::Client(ClientError::InvalidRequest { .. }) => ApiErrorCategory::Validation,
            Self::Client(_) => ApiErrorCategory::Transport,
            Self::Decode { .. } => ApiErrorCategory::Decode,
            Self::Validation(_) => ApiErrorCategory::Validation,
        }
    }

    /// The guild does not exist.
    pub fn is_not_found(&self) -> bool {
        self.category() == ApiErrorCategory::NotFound
    }

    /// Retries were exhausted.
    pub fn is_unavailable(&self) -> bool {
        self.category() == ApiErrorCategory::Unavailable
    }

    /// Underlying transport error, when there is one.
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            Self::Client(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidInput(message) => Self::Validation(message),
            other => Self::Validation(other.to_string()),
        }
    }
}

impl ErrorClassification for ApiError {
    fn is_retryable(&self) -> bool {
        self.is_unavailable()
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Client(err) => err.severity(),
            Self::Decode { .. } => ErrorSeverity::Error,
            Self::Validation(_) => ErrorSeverity::Warning,
        }
    }
}
