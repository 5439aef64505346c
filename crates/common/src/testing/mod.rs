//! Testing utilities and helpers
//!
//! - **[`sleep`]**: a [`Sleeper`](crate::resilience::Sleeper) that records
//!   requested delays and returns immediately
//! - **[`logs`]**: a `tracing-subscriber` layer that captures events and the
//!   fields of their enclosing spans
//!
//! ## Usage
//!
//! ```rust
//! # #[cfg(feature = "test-utils")]
//! # {
//! use byte_common::testing::{LogCapture, RecordingSleeper};
//!
//! let sleeper = RecordingSleeper::new();
//! assert!(sleeper.delays().is_empty());
//!
//! let capture = LogCapture::new();
//! let _guard = capture.set_default();
//! tracing::warn!(operation = "get_guild", "retrying");
//! assert_eq!(capture.events_with_message("retrying").len(), 1);
//! # }
//! ```

pub mod logs;
pub mod sleep;

pub use logs::{CapturedEvent, LogCapture};
pub use sleep::RecordingSleeper;
