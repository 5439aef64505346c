//! Health probe payloads

use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

/// Overall service status reported by `GET /health`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Ok,
    Degraded,
}

impl_domain_status_conversions!(HealthStatus {
    Ok => "ok",
    Degraded => "degraded",
});

/// Status of one backing component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentHealth {
    Healthy,
    Unhealthy,
}

impl_domain_status_conversions!(ComponentHealth {
    Healthy => "healthy",
    Unhealthy => "unhealthy",
});

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub database: ComponentHealth,
}

impl HealthReport {
    /// Overall status follows the database component.
    pub fn from_database(database: ComponentHealth) -> Self {
        let status = match database {
            ComponentHealth::Healthy => HealthStatus::Ok,
            ComponentHealth::Unhealthy => HealthStatus::Degraded,
        };
        Self { status, database }
    }

    /// True when the overall status is `ok`.
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Ok
    }
}

/// Readiness state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessStatus {
    /// Dependencies are reachable.
    Ready,
    /// A dependency is down.
    NotReady,
}

impl_domain_status_conversions!(ReadinessStatus {
    Ready => "ready",
    NotReady => "not_ready",
});

/// Body of `GET /health/ready`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessReport {
    pub status: ReadinessStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReadinessReport {
    /// Ready with no error.
    pub fn ready() -> Self {
        Self { status: ReadinessStatus::Ready, error: None }
    }

    /// Not ready with an error label.
    pub fn not_ready(error: impl Into<String>) -> Self {
        Self { status: ReadinessStatus::NotReady, error: Some(error.into()) }
    }
}

/// Body of `GET /health/live`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivenessReport {
    pub status: String,
}

impl Default for LivenessReport {
    fn default() -> Self {
        Self { status: "alive".to_string() }
    }
}
