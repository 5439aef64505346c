//! Common error types shared across the Byte crates.
//!
//! Module-specific errors should **compose** with [`CommonError`] rather than
//! duplicating common patterns:
//!
//! ```rust,ignore
//! #[derive(Debug, Error)]
//! pub enum MyModuleError {
//!     #[error("Invalid guild prefix: {0}")]
//!     InvalidPrefix(String),
//!
//!     #[error(transparent)]
//!     Common(#[from] CommonError),
//! }
//! ```
//!
//! Every error type that crosses a crate boundary implements
//! [`ErrorClassification`] so retry and alerting decisions stay consistent.
//!
//! | Level | Use Case | Examples |
//! |-------|----------|----------|
//! | **Info** | Expected conditions | Resource not found |
//! | **Warning** | Degraded but operational | Transient failures, timeouts |
//! | **Error** | Failure requiring attention | Invalid input, config errors |
//! | **Critical** | System integrity at risk | Internal invariant violations |

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Result alias for operations returning [`CommonError`].
pub type CommonResult<T> = Result<T, CommonError>;

/// Error patterns that appear in more than one crate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommonError {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input failed validation.
    #[error("Validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    /// An operation exceeded its deadline.
    #[error("Operation '{operation}' timed out after {duration:?}")]
    Timeout { operation: String, duration: Duration },

    /// Encoding or decoding failed.
    #[error("Serialization error ({format}): {message}")]
    Serialization { format: String, message: String },

    /// An internal invariant was violated.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CommonError {
    /// Build a [`CommonError::Config`].
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    /// Build a [`CommonError::Validation`] for `field`.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// Build a [`CommonError::Timeout`].
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout { operation: operation.into(), duration }
    }

    /// Build a [`CommonError::Serialization`].
    pub fn serialization(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Serialization { format: format.into(), message: message.into() }
    }

    /// Build a [`CommonError::Internal`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }
}

/// Standard interface for classifying errors by their characteristics.
pub trait ErrorClassification {
    /// Whether repeating the operation may succeed.
    fn is_retryable(&self) -> bool;

    /// Severity used for logging and alerting decisions.
    fn severity(&self) -> ErrorSeverity;

    /// Whether the error needs immediate attention.
    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

impl ErrorClassification for CommonError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Timeout { .. } => ErrorSeverity::Warning,
            Self::Config { .. } | Self::Validation { .. } | Self::Serialization { .. } => {
                ErrorSeverity::Error
            }
            Self::Internal { .. } => ErrorSeverity::Critical,
        }
    }
}
