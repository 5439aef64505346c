//! Guild persistence port and its in-memory adapter

mod memory;

use async_trait::async_trait;
use byte_domain::{CreateGuildRequest, GuildSchema, Result, UpdateGuildRequest};
use uuid::Uuid;

pub use memory::InMemoryGuildRepository;

/// Storage operations the guild routes depend on.
#[async_trait]
pub trait GuildRepository: Send + Sync {
    /// Insert a new guild; `DomainError::Conflict` if the Discord id exists.
    async fn create(&self, request: CreateGuildRequest) -> Result<GuildSchema>;

    /// Look up by Discord guild id.
    async fn get_by_guild_id(&self, guild_id: i64) -> Result<Option<GuildSchema>>;

    /// Apply a partial update; `DomainError::NotFound` if `id` is unknown.
    async fn update(&self, id: Uuid, update: UpdateGuildRequest) -> Result<GuildSchema>;

    /// Remove a guild; `DomainError::NotFound` if `id` is unknown.
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Cheap liveness probe of the backing store.
    async fn ping(&self) -> Result<()>;
}
