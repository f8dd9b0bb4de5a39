use async_trait::async_trait;
use domain_shared::discord::{ChannelId, GuildId, RoleId};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

/// Per-guild configuration as it is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildEntity {
    pub guild_id: GuildId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub blacklist: Vec<String>,
    #[serde(default)]
    pub auto_responses: Vec<AutoResponse>,
    #[serde(default)]
    pub text_channels: Vec<TextChannelEntity>,
    #[serde(default)]
    pub assignable_roles: Vec<AssignableRole>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoResponse {
    pub pattern: String,
    pub answer: String,
}

/// Subreddits relayed into a plain text channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChannelEntity {
    pub channel_id: ChannelId,
    #[serde(default)]
    pub subreddits: Vec<String>,
}

/// A role members may give themselves. Roles of the same group exclude each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignableRole {
    pub role_id: RoleId,
    pub group: String,
}

impl GuildEntity {
    pub fn new(guild_id: GuildId) -> Self {
        Self {
            guild_id,
            name: None,
            blacklist: Vec::new(),
            auto_responses: Vec::new(),
            text_channels: Vec::new(),
            assignable_roles: Vec::new(),
        }
    }

    /// All blacklisted patterns as one alternation, `None` when the blacklist is empty.
    #[instrument(level = "trace", skip(self), fields(guild_id = self.guild_id.0))]
    pub fn blacklist_pattern(&self) -> Result<Option<Regex>, regex::Error> {
        if self.blacklist.is_empty() {
            return Ok(None);
        }

        let pattern = self
            .blacklist
            .iter()
            .map(|pattern| format!("(?:{})", pattern))
            .collect::<Vec<_>>()
            .join("|");

        Regex::new(&pattern).map(Some)
    }

    pub fn assignable_role(&self, role_id: RoleId) -> Option<&AssignableRole> {
        self.assignable_roles
            .iter()
            .find(|role| role.role_id == role_id)
    }

    pub fn text_channel_mut(&mut self, channel_id: ChannelId) -> &mut TextChannelEntity {
        let position = self
            .text_channels
            .iter()
            .position(|channel| channel.channel_id == channel_id);

        let position = match position {
            Some(position) => position,
            None => {
                self.text_channels.push(TextChannelEntity {
                    channel_id,
                    subreddits: Vec::new(),
                });
                self.text_channels.len() - 1
            }
        };

        &mut self.text_channels[position]
    }
}

#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait GuildRepository {
    async fn get(&self, guild_id: GuildId) -> Result<Option<GuildEntity>, GuildRepositoryError>;
    async fn put(&self, entity: &GuildEntity) -> Result<u64, GuildRepositoryError>;
    async fn delete(&self, guild_id: GuildId) -> Result<u64, GuildRepositoryError>;
    async fn find_all(&self) -> Result<Vec<GuildEntity>, GuildRepositoryError>;
}

#[derive(Debug, Error)]
pub enum GuildRepositoryError {
    #[error("Service unavailable")]
    ServiceUnavailable,
}
