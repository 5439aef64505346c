//! Errors returned by [`HttpClient::execute`](super::HttpClient::execute)

use std::fmt;

use byte_common::{CorrelationId, ErrorClassification, ErrorSeverity, TransportFailureKind};
use thiserror::Error;

/// Cause of the final failed attempt of an exhausted call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LastFailure {
    Status { status: u16, body: String },
    Transport { kind: TransportFailureKind, message: String },
}

impl fmt::Display for LastFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status { status, .. } => write!(f, "HTTP {status}"),
            Self::Transport { kind, message } => write!(f, "{kind}: {message}"),
        }
    }
}

/// Final outcome of a logical call that did not succeed.
///
/// Only the final outcome crosses this boundary; retryable failures that
/// were retried away are visible in the retry statistics and logs only.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Terminal HTTP status (4xx, or anything outside the retryable range)
    #[error("{operation} failed with HTTP {status}")]
    Status {
        operation: String,
        status: u16,
        /// Response body, verbatim
        body: String,
        attempts: u32,
        correlation_id: CorrelationId,
    },

    /// Every attempt failed with a retryable error
    #[error("{operation} unavailable after {attempts} attempts: {last}")]
    RetriesExhausted {
        operation: String,
        attempts: u32,
        last: LastFailure,
        correlation_id: CorrelationId,
    },

    /// Transport failure that is not known to be transient
    #[error("{operation} failed with {kind} transport error: {message}")]
    Transport {
        operation: String,
        kind: TransportFailureKind,
        message: String,
        attempts: u32,
        correlation_id: CorrelationId,
    },

    /// The request could not be built; nothing was sent
    #[error("invalid request for {operation}: {message}")]
    InvalidRequest { operation: String, message: String },

    /// The client itself could not be constructed
    #[error("client configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Operation name, absent for configuration errors.
    pub fn operation(&self) -> Option<&str> {
        match self {
            Self::Status { operation, .. }
            | Self::RetriesExhausted { operation, .. }
            | Self::Transport { operation, .. }
            | Self::InvalidRequest { operation, .. } => Some(operation.as_str()),
            Self::Config(_) => None,
        }
    }

    /// Status of the last response, if any arrived.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. }
            | Self::RetriesExhausted { last: LastFailure::Status { status, .. }, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Attempts made before the call stopped.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Status { attempts, .. }
            | Self::RetriesExhausted { attempts, .. }
            | Self::Transport { attempts, .. } => *attempts,
            Self::InvalidRequest { .. } | Self::Config(_) => 0,
        }
    }

    /// Id carried by every attempt, if any attempt was made.
    pub fn correlation_id(&self) -> Option<&CorrelationId> {
        match self {
            Self::Status { correlation_id, .. }
            | Self::RetriesExhausted { correlation_id, .. }
            | Self::Transport { correlation_id, .. } => Some(correlation_id),
            Self::InvalidRequest { .. } | Self::Config(_) => None,
        }
    }

    /// Response body of a terminal status failure.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. }
            | Self::RetriesExhausted { last: LastFailure::Status { body, .. }, .. } => {
                Some(body.as_str())
            }
            _ => None,
        }
    }

    /// Terminal 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }

    /// Exhausted retries present as the remote service being unavailable.
    pub fn is_service_unavailable(&self) -> bool {
        matches!(self, Self::RetriesExhausted { .. })
    }

    /// Terminal 4xx status.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Status { status: 400..=499, .. })
    }
}

impl ErrorClassification for ClientError {
    fn is_retryable(&self) -> bool {
        self.is_service_unavailable()
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Status { .. } => ErrorSeverity::Warning,
            Self::RetriesExhausted { .. } | Self::Transport { .. } | Self::InvalidRequest { .. } => {
                ErrorSeverity::Error
            }
            Self::Config(_) => ErrorSeverity::Critical,
        }
    }
}
