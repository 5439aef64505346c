//! # Byte API
//!
//! HTTP service the Byte bot talks to.
//!
//! This crate contains:
//! - The axum router (health probes, metrics scrape, guild CRUD)
//! - Application state shared by handlers
//! - An in-memory guild repository
//!
//! ## Architecture
//! - Depends on `common`, `domain`, and `infra`
//! - Correlation and metrics middleware come from `byte-infra`

pub mod context;
pub mod error;
pub mod routes;
pub mod store;

// Re-export for convenience
pub use context::AppState;
pub use error::HandlerError;
pub use routes::build_router;
pub use store::{GuildRepository, InMemoryGuildRepository};
