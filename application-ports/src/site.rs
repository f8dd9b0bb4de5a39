use async_trait::async_trait;
use domain_shared::discord::{InteractionId, MessageId, UserId};
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct ButtonClickEvent {
    pub interaction_id: InteractionId,
    pub token: String,
    pub message_id: MessageId,
    pub user_id: UserId,
    pub button_id: String,
}

#[async_trait]
pub trait SitePort {
    fn handles(&self, button_id: &str) -> bool;
    async fn on_button_click(&self, event: ButtonClickEvent) -> Result<(), SiteError>;
}

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("This site has expired")]
    SiteNotFound,
    #[error("Only the author of the command can turn pages")]
    NotOwner,
    #[error("Unknown button")]
    UnknownButton,
    #[error("Service is temporarily unavailable")]
    TemporaryUnavailable,
}
