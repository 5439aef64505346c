//! Observability infrastructure for metrics and logging
//!
//! - [`logging`]: `tracing-subscriber` initialization from
//!   [`LoggingConfig`](byte_domain::LoggingConfig)
//! - [`metrics`]: the Prometheus registry backing `GET /metrics`
//!
//! ## Error Handling
//!
//! Recording never fails once the registry is built; only construction and
//! rendering return [`MetricsResult`].

pub mod logging;
pub mod metrics;

/// Metrics error type
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// A collector could not be created or registered
    #[error("Failed to register metric '{metric}': {source}")]
    Registration {
        /// Metric family name
        metric: &'static str,
        #[source]
        source: prometheus::Error,
    },

    /// The registry could not be rendered in the text format
    #[error("Failed to encode metrics: {0}")]
    Encode(String),
}

/// Result alias for metrics operations
pub type MetricsResult<T> = Result<T, MetricsError>;
