//! Request metrics
//!
//! Records `http_requests_total` and `http_request_duration_seconds` once
//! per request, labeled with the matched route template rather than the raw
//! path.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use futures::FutureExt;

use crate::observability::metrics::ApiMetrics;

/// Endpoint label when no `MatchedPath` is present, e.g. when the layer wraps
/// a router with `layer` instead of `route_layer`
pub const UNMATCHED_ENDPOINT: &str = "unmatched";

/// A panicking handler is recorded as status 500 and the panic is resumed,
/// leaving the response to the outer correlation layer.
pub async fn metrics_middleware(
    State(metrics): State<Arc<ApiMetrics>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().as_str().to_owned();
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| UNMATCHED_ENDPOINT.to_owned(), |path| path.as_str().to_owned());
    let started = Instant::now();

    match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => {
            metrics.observe_request(&method, &endpoint, response.status().as_u16(), started.elapsed());
            response
        }
        Err(panic) => {
            metrics.observe_request(&method, &endpoint, 500, started.elapsed());
            std::panic::resume_unwind(panic)
        }
    }
}
