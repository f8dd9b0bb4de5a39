use async_trait::async_trait;
use thiserror::Error;

#[async_trait]
pub trait PresenceJobHandlerPort {
    async fn tick(&self) -> Result<(), PresenceJobHandlerError>;
}

#[derive(Debug, Error)]
pub enum PresenceJobHandlerError {
    #[error("No activity is configured")]
    NoActivities,
    #[error("Service is temporarily unavailable")]
    TemporaryUnavailable,
}
