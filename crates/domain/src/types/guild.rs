//! Guild configuration contract
//!
//! These are the request/response bodies exchanged between the bot and the
//! API service. Field names are the wire names.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    DEFAULT_PREFIX, GUILD_NAME_MAX_LENGTH, GUILD_NAME_MIN_LENGTH, PREFIX_MAX_LENGTH,
    PREFIX_MIN_LENGTH,
};
use crate::errors::{DomainError, Result};

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

/// Stored guild configuration as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildSchema {
    pub id: Uuid,
    /// Discord guild snowflake
    pub guild_id: i64,
    pub guild_name: String,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default)]
    pub help_channel_id: Option<i64>,
    #[serde(default)]
    pub showcase_channel_id: Option<i64>,
    #[serde(default)]
    pub sync_label: Option<String>,
    #[serde(default)]
    pub issue_linking: bool,
    #[serde(default)]
    pub comment_linking: bool,
    #[serde(default)]
    pub pep_linking: bool,
}

impl GuildSchema {
    /// Materialize a stored guild from a validated create request.
    pub fn from_request(id: Uuid, request: CreateGuildRequest) -> Self {
        Self {
            id,
            guild_id: request.guild_id,
            guild_name: request.guild_name,
            prefix: request.prefix,
            help_channel_id: request.help_channel_id,
            showcase_channel_id: request.showcase_channel_id,
            sync_label: request.sync_label,
            issue_linking: request.issue_linking,
            comment_linking: request.comment_linking,
            pep_linking: request.pep_linking,
        }
    }

    /// Apply the fields present in `update`, leaving the rest untouched.
    pub fn apply(&mut self, update: UpdateGuildRequest) {
        if let Some(name) = update.guild_name {
            self.guild_name = name;
        }
        if let Some(prefix) = update.prefix {
            self.prefix = prefix;
        }
        if let Some(channel) = update.help_channel_id {
            self.help_channel_id = Some(channel);
        }
        if let Some(channel) = update.showcase_channel_id {
            self.showcase_channel_id = Some(channel);
        }
        if let Some(label) = update.sync_label {
            self.sync_label = Some(label);
        }
        if let Some(flag) = update.issue_linking {
            self.issue_linking = flag;
        }
        if let Some(flag) = update.comment_linking {
            self.comment_linking = flag;
        }
        if let Some(flag) = update.pep_linking {
            self.pep_linking = flag;
        }
    }
}

/// Body of `POST /api/guilds`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGuildRequest {
    pub guild_id: i64,
    pub guild_name: String,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_channel_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub showcase_channel_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_label: Option<String>,
    #[serde(default)]
    pub issue_linking: bool,
    #[serde(default)]
    pub comment_linking: bool,
    #[serde(default)]
    pub pep_linking: bool,
}

impl CreateGuildRequest {
    /// Request with the default prefix and every feature flag off.
    pub fn new(guild_id: i64, guild_name: impl Into<String>) -> Self {
        Self {
            guild_id,
            guild_name: guild_name.into(),
            prefix: default_prefix(),
            help_channel_id: None,
            showcase_channel_id: None,
            sync_label: None,
            issue_linking: false,
            comment_linking: false,
            pep_linking: false,
        }
    }

    /// Override the default command prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// # Errors
    /// Returns `DomainError::InvalidInput` when the name or prefix length is
    /// out of range.
    pub fn validate(&self) -> Result<()> {
        validate_guild_name(&self.guild_name)?;
        validate_prefix(&self.prefix)
    }
}

/// Body of `PATCH /api/guilds/{id}`; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateGuildRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_channel_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub showcase_channel_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_linking: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_linking: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pep_linking: Option<bool>,
}

impl UpdateGuildRequest {
    /// # Errors
    /// Returns `DomainError::InvalidInput` when a present name or prefix
    /// violates the length rules.
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.guild_name {
            validate_guild_name(name)?;
        }
        if let Some(prefix) = &self.prefix {
            validate_prefix(prefix)?;
        }
        Ok(())
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

fn validate_length(field: &str, value: &str, min: usize, max: usize) -> Result<()> {
    let len = value.chars().count();
    if (min..=max).contains(&len) {
        Ok(())
    } else {
        Err(DomainError::InvalidInput(format!(
            "{field} must be between {min} and {max} characters, got {len}"
        )))
    }
}

fn validate_guild_name(name: &str) -> Result<()> {
    validate_length("guild_name", name, GUILD_NAME_MIN_LENGTH, GUILD_NAME_MAX_LENGTH)
}

fn validate_prefix(prefix: &str) -> Result<()> {
    validate_length("prefix", prefix, PREFIX_MIN_LENGTH, PREFIX_MAX_LENGTH)
}
