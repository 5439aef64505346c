//! Metrics collection modules

pub mod registry;

// Re-export metric types for convenience
pub use registry::{ApiMetrics, OperationStatus, METRICS_CONTENT_TYPE};
