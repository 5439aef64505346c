//! Shared building blocks for the Byte bot and API services.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: errors, correlation ids, failure classification, retry
//!   policy math
//! - `runtime`: async infrastructure (sleepers, retry statistics store, retry
//!   logging)
//! - `test-utils`: deterministic sleepers and log capture for tests

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod correlation;
#[cfg(feature = "foundation")]
pub mod error;
#[cfg(feature = "foundation")]
pub mod resilience;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", all(test, feature = "runtime")))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "foundation")]
pub use correlation::{CorrelationId, CORRELATION_HEADER};
#[cfg(feature = "foundation")]
pub use error::{CommonError, CommonResult, ErrorClassification, ErrorSeverity};
#[cfg(feature = "foundation")]
pub use resilience::{
    classify, classify_status, Classification, FailureReason, Jitter, RetryPolicy,
    RetryPolicyConfig, RetryPolicyConfigBuilder, RetryStep, TransportFailureKind,
    TransportOutcome,
};
#[cfg(feature = "runtime")]
pub use resilience::{RetryLog, RetryStats, RetryStatsSnapshot, Sleeper, TokioSleeper};
