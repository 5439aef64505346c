//! Domain types and models

pub mod guild;
pub mod health;

pub use guild::{CreateGuildRequest, GuildSchema, UpdateGuildRequest};
pub use health::{
    ComponentHealth, HealthReport, HealthStatus, LivenessReport, ReadinessReport, ReadinessStatus,
};
