//! Axum middleware for the API service
//!
//! Layer order matters: correlation is the outer layer so that every log
//! line and every response, including those produced by a panicking
//! handler, carries the request's id; metrics is a route layer so it can
//! label samples with the matched route template.

pub mod correlation;
pub mod metrics;

use std::sync::Arc;

use axum::middleware::{from_fn, from_fn_with_state};
use axum::Router;

pub use correlation::correlation_middleware;
pub use metrics::{metrics_middleware, UNMATCHED_ENDPOINT};

use crate::observability::metrics::ApiMetrics;

/// Wrap `router` in the metrics and correlation layers.
///
/// Call after all routes are added; routes added later are not measured.
pub fn instrument<S>(router: Router<S>, metrics: Arc<ApiMetrics>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .route_layer(from_fn_with_state(metrics, metrics_middleware))
        .layer(from_fn(correlation_middleware))
}
