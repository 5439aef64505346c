//! Failure classification for outbound calls.
//!
//! Policy:
//! - `500..=599` and connection/timeout failures are retryable
//! - `400..=499` are terminal and surfaced to the caller unchanged
//! - successes never reach the retry path; the classifier reports them as
//!   terminal so a caller forgetting to check success cannot loop
//! - unrecognized transport failures are terminal (fail closed)

use std::fmt;

/// Kind of failure observed before any HTTP status was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportFailureKind {
    /// Connection could not be established (refused, reset, DNS).
    Connect,
    /// Connection establishment exceeded its deadline.
    ConnectTimeout,
    /// No complete response arrived within the per-attempt timeout.
    ReadTimeout,
    /// Anything the transport reported that is not one of the above.
    Unknown,
}

impl TransportFailureKind {
    /// True for connect and read timeouts.
    pub const fn is_timeout(self) -> bool {
        matches!(self, Self::ConnectTimeout | Self::ReadTimeout)
    }

    /// Stable label for logs and metrics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::ConnectTimeout => "connect_timeout",
            Self::ReadTimeout => "read_timeout",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TransportFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Completed outcome of one transport attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportOutcome {
    /// A response arrived with this status code.
    Status(u16),
    /// The attempt failed before a status was received.
    Failure(TransportFailureKind),
}

impl TransportOutcome {
    /// 2xx and 3xx responses.
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Status(200..=399))
    }
}

impl fmt::Display for TransportOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => write!(f, "HTTP {status}"),
            Self::Failure(kind) => write!(f, "transport failure ({kind})"),
        }
    }
}

/// Whether another attempt is permitted after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Retryable,
    Terminal,
}

impl Classification {
    /// True for [`Classification::Retryable`].
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Retryable)
    }
}

/// Classify a bare status code.
pub const fn classify_status(status: u16) -> Classification {
    match status {
        500..=599 => Classification::Retryable,
        _ => Classification::Terminal,
    }
}

/// Classify a transport outcome.
pub const fn classify(outcome: &TransportOutcome) -> Classification {
    match outcome {
        TransportOutcome::Status(status) => classify_status(*status),
        TransportOutcome::Failure(
            TransportFailureKind::Connect
            | TransportFailureKind::ConnectTimeout
            | TransportFailureKind::ReadTimeout,
        ) => Classification::Retryable,
        TransportOutcome::Failure(TransportFailureKind::Unknown) => Classification::Terminal,
    }
}
