//! Resilience primitives for cross-service calls
//!
//! The pieces are separate and individually testable:
//! - **Classification** ([`classify`]): maps a transport outcome to
//!   [`Classification::Retryable`] or [`Classification::Terminal`]
//! - **Policy** ([`RetryPolicy`]): decides whether another attempt happens and
//!   how long to wait before it, producing one [`RetryStep`] per attempt
//! - **Statistics** ([`RetryStats`]): per-client counters shared by all calls
//! - **Sleeping** ([`Sleeper`]): the only place time passes, injectable so
//!   tests never wait on a real clock
//!
//! The HTTP client in `byte-infra` drives these in a plain loop:
//!
//! ```rust
//! use byte_common::resilience::{RetryPolicy, RetryStep, TransportOutcome};
//!
//! let policy = RetryPolicy::default();
//! assert!(matches!(policy.next_step(1, &TransportOutcome::Status(503)), RetryStep::Retry { .. }));
//! assert!(matches!(policy.next_step(3, &TransportOutcome::Status(503)), RetryStep::Fail { .. }));
//! assert_eq!(policy.next_step(1, &TransportOutcome::Status(200)), RetryStep::Success);
//! ```

pub mod classify;
pub mod constants;
pub mod policy;
#[cfg(feature = "runtime")]
pub mod sleep;
#[cfg(feature = "runtime")]
pub mod stats;
#[cfg(feature = "observability")]
pub mod tracing;

pub use classify::{classify, classify_status, Classification, TransportFailureKind, TransportOutcome};
pub use policy::{
    FailureReason, Jitter, RetryPolicy, RetryPolicyConfig, RetryPolicyConfigBuilder, RetryStep,
};
#[cfg(feature = "runtime")]
pub use sleep::{Sleeper, TokioSleeper};
#[cfg(feature = "runtime")]
pub use stats::{RetryStats, RetryStatsSnapshot};
#[cfg(feature = "observability")]
pub use self::tracing::RetryLog;
