//! Guild API client on top of the resilient HTTP client

use byte_common::{CorrelationId, RetryStatsSnapshot};
use byte_domain::{ClientSettings, CreateGuildRequest, GuildSchema, HealthReport, UpdateGuildRequest};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::errors::ApiError;
use crate::config::retry_policy;
use crate::http::{ApiResponse, HttpClient, RequestSpec};

/// Typed client for the Byte API service
#[derive(Debug, Clone)]
pub struct ByteApiClient {
    http: HttpClient,
}

impl ByteApiClient {
    /// Wrap an already configured HTTP client.
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Build a client from loaded settings.
    ///
    /// # Errors
    /// Returns [`ApiError::Validation`] for inconsistent retry settings, or
    /// the client configuration error when the base URL is invalid.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, ApiError> {
        let http = HttpClient::builder()
            .base_url(settings.base_url.clone())
            .attempt_timeout(settings.attempt_timeout())
            .retry_policy(retry_policy(settings)?)
            .user_agent(concat!("byte-bot/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::new(http))
    }

    /// The underlying retrying client.
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Counters accumulated by every call made through this client.
    pub fn retry_stats(&self) -> RetryStatsSnapshot {
        self.http.retry_stats()
    }

    /// `POST /api/guilds`
    ///
    /// # Errors
    /// Returns [`ApiError::Validation`] without sending anything when the
    /// request breaks the name or prefix rules.
    #[instrument(skip(self, request), fields(guild_id = request.guild_id))]
    pub async fn create_guild(&self, request: CreateGuildRequest) -> Result<GuildSchema, ApiError> {
        request.validate()?;
        self.create_guild_with(request, None).await
    }

    /// `GET /api/guilds/{guild_id}`; a 404 yields `Ok(None)`.
    ///
    /// # Errors
    /// Any failure other than 404.
    #[instrument(skip(self))]
    pub async fn get_guild(&self, guild_id: i64) -> Result<Option<GuildSchema>, ApiError> {
        self.get_guild_with(guild_id, None).await
    }

    /// `PATCH /api/guilds/{id}` with only the fields present in `update`.
    ///
    /// # Errors
    /// Returns [`ApiError::Validation`] for a present field breaking the
    /// length rules.
    #[instrument(skip(self, update))]
    pub async fn update_guild(
        &self,
        id: Uuid,
        update: UpdateGuildRequest,
    ) -> Result<GuildSchema, ApiError> {
        update.validate()?;
        let spec = RequestSpec::patch(format!("/api/guilds/{id}")).json(&update);
        let response = self.http.execute("update_guild", spec).await?;
        decode("update_guild", &response)
    }

    /// `DELETE /api/guilds/{id}`
    ///
    /// # Errors
    /// Any non-success outcome, including 404.
    #[instrument(skip(self))]
    pub async fn delete_guild(&self, id: Uuid) -> Result<(), ApiError> {
        self.http.execute("delete_guild", RequestSpec::delete(format!("/api/guilds/{id}"))).await?;
        Ok(())
    }

    /// Look the guild up and create it when it does not exist yet.
    ///
    /// Both calls share one correlation id.
    ///
    /// # Errors
    /// Propagates the first failing call.
    #[instrument(skip(self, guild_name, prefix))]
    pub async fn get_or_create_guild(
        &self,
        guild_id: i64,
        guild_name: &str,
        prefix: &str,
    ) -> Result<GuildSchema, ApiError> {
        let request = CreateGuildRequest::new(guild_id, guild_name).with_prefix(prefix);
        request.validate()?;

        let correlation_id = CorrelationId::generate();
        if let Some(guild) = self.get_guild_with(guild_id, Some(correlation_id.clone())).await? {
            debug!(guild_id, "guild already registered");
            return Ok(guild);
        }

        info!(guild_id, "registering new guild");
        self.create_guild_with(request, Some(correlation_id)).await
    }

    /// `GET /health`
    ///
    /// # Errors
    /// A degraded service answers 503, which is retried and then reported as
    /// unavailable.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<HealthReport, ApiError> {
        let response = self.http.execute("health_check", RequestSpec::get("/health")).await?;
        decode("health_check", &response)
    }

    async fn create_guild_with(
        &self,
        request: CreateGuildRequest,
        correlation_id: Option<CorrelationId>,
    ) -> Result<GuildSchema, ApiError> {
        let mut spec = RequestSpec::post("/api/guilds").json(&request);
        if let Some(id) = correlation_id {
            spec = spec.correlation_id(id);
        }
        let response = self.http.execute("create_guild", spec).await?;
        decode("create_guild", &response)
    }

    async fn get_guild_with(
        &self,
        guild_id: i64,
        correlation_id: Option<CorrelationId>,
    ) -> Result<Option<GuildSchema>, ApiError> {
        let mut spec = RequestSpec::get(format!("/api/guilds/{guild_id}"));
        if let Some(id) = correlation_id {
            spec = spec.correlation_id(id);
        }
        match self.http.execute("get_guild", spec).await {
            Ok(response) => decode("get_guild", &response).map(Some),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

fn decode<T: DeserializeOwned>(operation: &str, response: &ApiResponse) -> Result<T, ApiError> {
    response.json().map_err(|err| ApiError::Decode {
        operation: operation.to_owned(),
        message: err.to_string(),
    })
}
