//! Structured log records for the retry loop
//!
//! Every record carries the operation name and correlation id so one logical
//! call can be followed across its attempts.

use std::time::Duration;

use ::tracing::{debug, info, warn};

use super::classify::TransportOutcome;

/// Log context for one logical outbound call
#[derive(Debug, Clone)]
pub struct RetryLog<'a> {
    operation: &'a str,
    correlation_id: &'a str,
    max_attempts: u32,
}

impl<'a> RetryLog<'a> {
    /// Start logging a call
    pub fn start(operation: &'a str, correlation_id: &'a str, max_attempts: u32) -> Self {
        debug!(
            operation = operation,
            correlation_id = correlation_id,
            max_attempts = max_attempts,
            "Starting outbound call"
        );
        Self { operation, correlation_id, max_attempts }
    }

    /// Operation name this log belongs to.
    pub fn operation(&self) -> &str {
        self.operation
    }

    /// One WARN line before each backoff sleep
    pub fn record_retry(&self, attempt: u32, delay: Duration, cause: &TransportOutcome) {
        warn!(
            operation = self.operation,
            correlation_id = self.correlation_id,
            attempt = attempt,
            max_attempts = self.max_attempts,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            cause = %cause,
            "Retrying after retryable failure"
        );
    }

    /// Record a successful call
    pub fn record_success(&self, attempts: u32, status: u16) {
        if attempts > 1 {
            info!(
                operation = self.operation,
                correlation_id = self.correlation_id,
                attempts = attempts,
                status = status,
                "Outbound call succeeded after retry"
            );
        } else {
            debug!(
                operation = self.operation,
                correlation_id = self.correlation_id,
                status = status,
                "Outbound call succeeded"
            );
        }
    }

    /// Record that all attempts have been exhausted
    pub fn record_exhausted(&self, attempts: u32, cause: &TransportOutcome) {
        warn!(
            operation = self.operation,
            correlation_id = self.correlation_id,
            attempts = attempts,
            cause = %cause,
            "All retry attempts exhausted"
        );
    }

    /// Record a terminal failure
    pub fn record_terminal(&self, attempt: u32, cause: &TransportOutcome) {
        warn!(
            operation = self.operation,
            correlation_id = self.correlation_id,
            attempt = attempt,
            cause = %cause,
            "Outbound call failed with terminal error"
        );
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for resilience::tracing.
    use super::super::classify::TransportFailureKind;
    use super::*;

    /// Validates `RetryLog::start` keeps the call context.
    ///
    /// Assertions:
    /// - Confirms `operation` equals `"get_guild"`.
    #[test]
    fn test_retry_log_creation() {
        let log = RetryLog::start("get_guild", "abc-123", 3);
        assert_eq!(log.operation(), "get_guild");
        assert_eq!(log.max_attempts, 3);
        assert_eq!(log.correlation_id, "abc-123");
    }

    /// Validates every record method without a subscriber installed.
    ///
    /// Assertion coverage: ensures the routine completes without panicking.
    #[test]
    fn test_records_without_subscriber() {
        let log = RetryLog::start("get_guild", "abc-123", 3);
        log.record_retry(1, Duration::from_secs(1), &TransportOutcome::Status(503));
        log.record_retry(
            2,
            Duration::from_secs(2),
            &TransportOutcome::Failure(TransportFailureKind::ReadTimeout),
        );
        log.record_exhausted(3, &TransportOutcome::Status(503));
        log.record_terminal(1, &TransportOutcome::Status(404));
        log.record_success(2, 200);
        log.record_success(1, 200);
    }
}
