use async_trait::async_trait;
use thiserror::Error;

#[async_trait]
pub trait RedditFeedJobHandlerPort {
    async fn tick(&self) -> Result<(), RedditFeedJobHandlerError>;
}

#[derive(Debug, Error)]
pub enum RedditFeedJobHandlerError {
    #[error("No subreddit is subscribed")]
    NoSubscriptions,
    #[error("Service is temporarily unavailable")]
    TemporaryUnavailable,
}
