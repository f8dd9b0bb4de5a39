mod create_action_row;
mod create_button;
mod create_embed;
mod create_message;
mod role_diff;

pub use create_action_row::CreateActionRow;
pub use create_button::{ButtonId, ButtonKind, CreateButton};
pub use create_embed::{CreateEmbed, EmbedField};
pub use create_message::CreateMessage;
pub use role_diff::RoleDiff;

use async_trait::async_trait;
use domain_shared::discord::{
    ChannelId, GuildId, InteractionId, MessageId, ReplyTarget, RoleId, UserId, WebhookId,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Webhook {
    pub webhook_id: WebhookId,
    pub url: String,
}

#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait DiscordPort {
    async fn send_message(
        &self,
        channel_id: ChannelId,
        message: CreateMessage,
    ) -> Result<MessageId, DiscordError>;

    /// First answer to an event.
    async fn reply(
        &self,
        target: &ReplyTarget,
        message: CreateMessage,
    ) -> Result<MessageId, DiscordError>;

    /// Any answer after the first one.
    async fn follow_up(
        &self,
        target: &ReplyTarget,
        message: CreateMessage,
    ) -> Result<MessageId, DiscordError>;

    /// Replaces the message a component belongs to as the answer to the component interaction.
    async fn update_interaction_message(
        &self,
        interaction_id: InteractionId,
        token: &str,
        message: CreateMessage,
    ) -> Result<(), DiscordError>;

    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        reason: &str,
    ) -> Result<(), DiscordError>;

    async fn find_member_roles(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Vec<RoleId>, DiscordError>;

    async fn apply_role_diff(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_diff: &RoleDiff,
        reason: &str,
    ) -> Result<(), DiscordError>;

    async fn create_webhook(&self, channel_id: ChannelId, name: &str)
        -> Result<Webhook, DiscordError>;

    async fn delete_webhook(&self, webhook_id: WebhookId) -> Result<(), DiscordError>;

    async fn execute_webhook(&self, url: &str, message: CreateMessage)
        -> Result<(), DiscordError>;
}

#[derive(Debug, Error)]
pub enum DiscordError {
    #[error("Discord is unavailable")]
    DiscordUnavailable,
    #[error("Not found")]
    NotFound,
    #[error("Missing access")]
    MissingAccess,
}
