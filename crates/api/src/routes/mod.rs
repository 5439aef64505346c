//! Router assembly

pub mod guilds;
pub mod health;
pub mod metrics;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use byte_infra::middleware;

use crate::context::AppState;

/// Route template for a single guild; also the metrics endpoint label.
pub const GUILD_ROUTE: &str = "/api/guilds/{guild_id}";

/// Build the service router with correlation and metrics middleware applied.
pub fn build_router(state: AppState) -> Router {
    let metrics = Arc::clone(&state.metrics);

    let router = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::ready))
        .route("/health/live", get(health::live))
        .route("/metrics", get(metrics::scrape))
        .route("/api/guilds", post(guilds::create_guild))
        .route(
            GUILD_ROUTE,
            get(guilds::get_guild).patch(guilds::update_guild).delete(guilds::delete_guild),
        )
        .with_state(state);

    middleware::instrument(router, metrics)
}
