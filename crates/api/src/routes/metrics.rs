//! Prometheus scrape handler

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use byte_infra::observability::metrics::METRICS_CONTENT_TYPE;

use crate::context::AppState;
use crate::error::HandlerError;

/// Prometheus text exposition of the service's registry.
pub async fn scrape(State(state): State<AppState>) -> Result<impl IntoResponse, HandlerError> {
    let body = state.metrics.render().map_err(|err| HandlerError::Internal(err.to_string()))?;
    Ok(([(CONTENT_TYPE, METRICS_CONTENT_TYPE)], body))
}
