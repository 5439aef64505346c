//! Health probes
//!
//! `/health` and `/health/ready` ping the guild store and answer 503 when it
//! is down; `/health/live` only proves the process is serving.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use byte_domain::{ComponentHealth, HealthReport, LivenessReport, ReadinessReport};
use tracing::warn;

use crate::context::AppState;

async fn database_health(state: &AppState) -> ComponentHealth {
    state.metrics.record_db_query("ping");
    match state.guilds.ping().await {
        Ok(()) => ComponentHealth::Healthy,
        Err(err) => {
            warn!(error = %err, "database ping failed");
            ComponentHealth::Unhealthy
        }
    }
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let report = HealthReport::from_database(database_health(&state).await);
    let status =
        if report.is_healthy() { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status, Json(report))
}

/// `GET /health/ready`
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadinessReport>) {
    match database_health(&state).await {
        ComponentHealth::Healthy => (StatusCode::OK, Json(ReadinessReport::ready())),
        ComponentHealth::Unhealthy => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessReport::not_ready("database_unavailable")),
        ),
    }
}

/// `GET /health/live`
pub async fn live() -> Json<LivenessReport> {
    Json(LivenessReport::default())
}
