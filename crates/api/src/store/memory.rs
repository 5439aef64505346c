//! In-memory guild repository

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use byte_domain::{
    CreateGuildRequest, DomainError, GuildSchema, Result, UpdateGuildRequest,
};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use super::GuildRepository;

/// `DashMap`-backed repository keyed by record id, with a secondary index on
/// the Discord guild id.
#[derive(Debug)]
pub struct InMemoryGuildRepository {
    guilds: DashMap<Uuid, GuildSchema>,
    by_guild_id: DashMap<i64, Uuid>,
    available: AtomicBool,
}

impl Default for InMemoryGuildRepository {
    fn default() -> Self {
        Self { guilds: DashMap::new(), by_guild_id: DashMap::new(), available: AtomicBool::new(true) }
    }
}

impl InMemoryGuildRepository {
    /// Empty, available repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the store going down or coming back; while unavailable every
    /// operation fails with `DomainError::Internal`.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of stored guilds.
    pub fn len(&self) -> usize {
        self.guilds.len()
    }

    /// True when no guild is stored.
    pub fn is_empty(&self) -> bool {
        self.guilds.is_empty()
    }

    fn ensure_available(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DomainError::Internal("guild store unavailable".to_string()))
        }
    }
}

#[async_trait]
impl GuildRepository for InMemoryGuildRepository {
    async fn create(&self, request: CreateGuildRequest) -> Result<GuildSchema> {
        self.ensure_available()?;
        match self.by_guild_id.entry(request.guild_id) {
            Entry::Occupied(_) => {
                Err(DomainError::Conflict(format!("Guild {} already exists", request.guild_id)))
            }
            Entry::Vacant(slot) => {
                let guild = GuildSchema::from_request(Uuid::new_v4(), request);
                self.guilds.insert(guild.id, guild.clone());
                slot.insert(guild.id);
                Ok(guild)
            }
        }
    }

    async fn get_by_guild_id(&self, guild_id: i64) -> Result<Option<GuildSchema>> {
        self.ensure_available()?;
        let Some(id) = self.by_guild_id.get(&guild_id).map(|entry| *entry) else {
            return Ok(None);
        };
        Ok(self.guilds.get(&id).map(|entry| entry.value().clone()))
    }

    async fn update(&self, id: Uuid, update: UpdateGuildRequest) -> Result<GuildSchema> {
        self.ensure_available()?;
        let mut guild = self
            .guilds
            .get_mut(&id)
            .ok_or_else(|| DomainError::NotFound(format!("Guild {id} not found")))?;
        guild.apply(update);
        Ok(guild.value().clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.ensure_available()?;
        let (_, guild) = self
            .guilds
            .remove(&id)
            .ok_or_else(|| DomainError::NotFound(format!("Guild {id} not found")))?;
        self.by_guild_id.remove(&guild.guild_id);
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        self.ensure_available()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    /// Validates the create/get/update/delete lifecycle.
    ///
    /// Assertions:
    /// - Confirms created guilds are found by Discord id.
    /// - Confirms updates touch only supplied fields.
    /// - Confirms delete clears the secondary index.
    #[tokio::test]
    async fn test_guild_lifecycle() {
        let repo = InMemoryGuildRepository::new();
        let created = repo.create(CreateGuildRequest::new(42, "Python Discord")).await.unwrap();
        assert_eq!(created.prefix, "!");

        let found = repo.get_by_guild_id(42).await.unwrap().unwrap();
        assert_eq!(found, created);

        let update = UpdateGuildRequest { prefix: Some("?".into()), ..UpdateGuildRequest::default() };
        let updated = repo.update(created.id, update).await.unwrap();
        assert_eq!(updated.prefix, "?");
        assert_eq!(updated.guild_name, "Python Discord");

        repo.delete(created.id).await.unwrap();
        assert!(repo.get_by_guild_id(42).await.unwrap().is_none());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_guild_id_conflicts() {
        let repo = InMemoryGuildRepository::new();
        repo.create(CreateGuildRequest::new(1, "one")).await.unwrap();
        let err = repo.create(CreateGuildRequest::new(1, "again")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let repo = InMemoryGuildRepository::new();
        let id = Uuid::new_v4();
        assert!(matches!(
            repo.update(id, UpdateGuildRequest::default()).await,
            Err(DomainError::NotFound(_))
        ));
        assert!(matches!(repo.delete(id).await, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_every_call() {
        let repo = InMemoryGuildRepository::new();
        repo.set_available(false);
        assert!(repo.ping().await.is_err());
        assert!(repo.get_by_guild_id(1).await.is_err());
        repo.set_available(true);
        assert!(repo.ping().await.is_ok());
    }

    /// Validates concurrent creates of one Discord id.
    ///
    /// Assertions:
    /// - Confirms exactly one create wins.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_single_winner() {
        let repo = Arc::new(InMemoryGuildRepository::new());
        let tasks: Vec<_> = (0..16)
            .map(|n| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move { repo.create(CreateGuildRequest::new(7, format!("g{n}"))).await })
            })
            .collect();

        let mut wins = 0;
        for task in tasks {
            if task.await.unwrap().is_ok() {
                wins += 1;
            }
        }
        assert_eq!(wins, 1);
        assert_eq!(repo.len(), 1);
    }
}
