//! Application state shared by every handler

use std::sync::Arc;

use byte_infra::observability::metrics::ApiMetrics;
use byte_infra::observability::MetricsResult;

use crate::store::{GuildRepository, InMemoryGuildRepository};

/// Type alias for the guild repository trait object
pub type DynGuildRepository = dyn GuildRepository + Send + Sync + 'static;

/// Handler state: the metrics store and the guild repository.
///
/// Cloning is cheap; both members are reference counted.
#[derive(Clone)]
pub struct AppState {
    pub metrics: Arc<ApiMetrics>,
    pub guilds: Arc<DynGuildRepository>,
}

impl AppState {
    /// State over an existing registry and repository.
    pub fn new(metrics: Arc<ApiMetrics>, guilds: Arc<DynGuildRepository>) -> Self {
        Self { metrics, guilds }
    }

    /// Fresh metrics registry and an empty in-memory repository
    pub fn in_memory() -> MetricsResult<Self> {
        Ok(Self::new(Arc::new(ApiMetrics::new()?), Arc::new(InMemoryGuildRepository::new())))
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").field("metrics", &self.metrics).finish_non_exhaustive()
    }
}
