use async_trait::async_trait;
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait PresencePort {
    /// Shows `activity` as what the bot is playing, on every shard.
    async fn set_activity(&self, activity: &str) -> Result<(), PresenceError>;
}

#[derive(Debug, Error)]
pub enum PresenceError {
    #[error("The bot is not connected to the gateway")]
    NotConnected,
}
