//! Mapping transport errors onto failure kinds

use std::fmt;
use std::time::Duration;

use byte_common::TransportFailureKind;

/// A failed attempt that produced no HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    /// Classified failure kind.
    pub kind: TransportFailureKind,
    /// Transport error text.
    pub message: String,
}

impl TransportFailure {
    /// Failure of `kind` with a message.
    pub fn new(kind: TransportFailureKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    /// Per-attempt deadline expired before a complete response arrived.
    pub fn timed_out(timeout: Duration) -> Self {
        Self::new(TransportFailureKind::ReadTimeout, format!("no response within {timeout:?}"))
    }

    /// Classify a reqwest error.
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        Self::new(failure_kind(err), err.to_string())
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Classify a reqwest error.
///
/// Builder, redirect, decode, and body errors are not connection problems
/// and map to [`TransportFailureKind::Unknown`].
pub fn failure_kind(err: &reqwest::Error) -> TransportFailureKind {
    if err.is_timeout() {
        if err.is_connect() {
            TransportFailureKind::ConnectTimeout
        } else {
            TransportFailureKind::ReadTimeout
        }
    } else if err.is_connect() {
        TransportFailureKind::Connect
    } else {
        TransportFailureKind::Unknown
    }
}
