use crate::command::Author;
use async_trait::async_trait;
use domain_shared::discord::{ChannelId, GuildId, MessageId};
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct MessageEvent {
    pub guild_id: Option<GuildId>,
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub author: Author,
    pub content: String,
}

#[async_trait]
pub trait MessageListenerPort {
    /// Returns `true` if the message was removed and must not be processed further.
    async fn on_message(&self, event: &MessageEvent) -> Result<bool, MessageListenerError>;
}

#[derive(Debug, Error)]
pub enum MessageListenerError {
    #[error("Service is temporarily unavailable")]
    TemporaryUnavailable,
}
