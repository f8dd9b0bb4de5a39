use async_trait::async_trait;
use domain_shared::discord::{ChannelId, GuildId, WebhookId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A webhook the bot created to relay subreddits into a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookEntity {
    pub webhook_id: WebhookId,
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub subreddits: Vec<String>,
}

#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait WebhookRepository {
    async fn get(&self, webhook_id: WebhookId)
        -> Result<Option<WebhookEntity>, WebhookRepositoryError>;
    async fn put(&self, entity: &WebhookEntity) -> Result<u64, WebhookRepositoryError>;
    async fn delete(&self, webhook_id: WebhookId) -> Result<u64, WebhookRepositoryError>;
    async fn find_all(&self) -> Result<Vec<WebhookEntity>, WebhookRepositoryError>;
    async fn find_by_guild(
        &self,
        guild_id: GuildId,
    ) -> Result<Vec<WebhookEntity>, WebhookRepositoryError>;
}

#[derive(Debug, Error)]
pub enum WebhookRepositoryError {
    #[error("Service unavailable")]
    ServiceUnavailable,
}
