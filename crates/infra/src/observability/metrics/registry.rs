//! Prometheus metrics for the API service
//!
//! Request-level families are recorded by the metrics middleware; business
//! families are incremented explicitly by handlers. Every family lives in a
//! registry owned by [`ApiMetrics`], so independent instances never collide.

use std::time::Duration;

use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};

use crate::observability::{MetricsError, MetricsResult};

/// Content type of the Prometheus text exposition format
pub const METRICS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Latency buckets in seconds
const DURATION_BUCKETS: [f64; 11] = [0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// Outcome label of a business operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStatus {
    /// Completed without error.
    Success,
    /// Returned an error response.
    Error,
}

impl OperationStatus {
    /// Value of the `status` label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Shared metrics store
#[derive(Debug, Clone)]
pub struct ApiMetrics {
    registry: Registry,
    http_requests: CounterVec,
    http_duration: HistogramVec,
    guild_operations: CounterVec,
    db_queries: CounterVec,
}

impl ApiMetrics {
    /// Create every metric family in a fresh registry.
    ///
    /// # Errors
    /// Returns [`MetricsError::Registration`] if a family cannot be created.
    pub fn new() -> MetricsResult<Self> {
        let registry = Registry::new();

        let http_requests = counter(
            &registry,
            "http_requests_total",
            "Total HTTP requests",
            &["method", "endpoint", "status"],
        )?;

        let http_duration = histogram(
            &registry,
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
            &["method", "endpoint"],
        )?;

        let guild_operations = counter(
            &registry,
            "guild_operations_total",
            "Total guild operations",
            &["operation", "status"],
        )?;

        let db_queries =
            counter(&registry, "db_queries_total", "Total database queries", &["operation"])?;

        Ok(Self { registry, http_requests, http_duration, guild_operations, db_queries })
    }

    /// Record one completed HTTP request.
    pub fn observe_request(&self, method: &str, endpoint: &str, status: u16, elapsed: Duration) {
        let status = status.to_string();
        self.http_requests.with_label_values(&[method, endpoint, status.as_str()]).inc();
        self.http_duration.with_label_values(&[method, endpoint]).observe(elapsed.as_secs_f64());
    }

    /// Count one guild operation outcome.
    pub fn record_guild_operation(&self, operation: &str, status: OperationStatus) {
        self.guild_operations.with_label_values(&[operation, status.as_str()]).inc();
    }

    /// Count one store query.
    pub fn record_db_query(&self, operation: &str) {
        self.db_queries.with_label_values(&[operation]).inc();
    }

    /// Current value of `http_requests_total` for one label set. Looking up
    /// an unseen label set creates it at zero.
    pub fn request_count(&self, method: &str, endpoint: &str, status: u16) -> u64 {
        let status = status.to_string();
        counter_value(&self.http_requests, &[method, endpoint, status.as_str()])
    }

    /// Current value of `guild_operations_total` for one label set.
    pub fn guild_operation_count(&self, operation: &str, status: OperationStatus) -> u64 {
        counter_value(&self.guild_operations, &[operation, status.as_str()])
    }

    /// Current value of `db_queries_total` for one operation.
    pub fn db_query_count(&self, operation: &str) -> u64 {
        counter_value(&self.db_queries, &[operation])
    }

    /// The underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Render every family in the text exposition format.
    ///
    /// # Errors
    /// Returns [`MetricsError::Encode`] if encoding fails.
    pub fn render(&self) -> MetricsResult<String> {
        let families = self.registry.gather();
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&families, &mut buffer)
            .map_err(|err| MetricsError::Encode(err.to_string()))?;
        String::from_utf8(buffer).map_err(|err| MetricsError::Encode(err.to_string()))
    }
}

fn counter(
    registry: &Registry,
    metric: &'static str,
    help: &str,
    labels: &[&str],
) -> MetricsResult<CounterVec> {
    let counter = CounterVec::new(Opts::new(metric, help), labels)
        .map_err(|source| MetricsError::Registration { metric, source })?;
    registry
        .register(Box::new(counter.clone()))
        .map_err(|source| MetricsError::Registration { metric, source })?;
    Ok(counter)
}

fn histogram(
    registry: &Registry,
    metric: &'static str,
    help: &str,
    labels: &[&str],
) -> MetricsResult<HistogramVec> {
    let opts = HistogramOpts::new(metric, help).buckets(DURATION_BUCKETS.to_vec());
    let histogram = HistogramVec::new(opts, labels)
        .map_err(|source| MetricsError::Registration { metric, source })?;
    registry
        .register(Box::new(histogram.clone()))
        .map_err(|source| MetricsError::Registration { metric, source })?;
    Ok(histogram)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn counter_value(counter: &CounterVec, labels: &[&str]) -> u64 {
    counter.get_metric_with_label_values(labels).map_or(0, |c| c.get() as u64)
}
