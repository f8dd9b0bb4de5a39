use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// A submission as it is relayed into Discord.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: String,
    pub subreddit: String,
    pub title: String,
    pub author: String,
    pub permalink: String,
    pub url: Option<String>,
    pub nsfw: bool,
    pub created_at: DateTime<Utc>,
}

impl Link {
    pub fn permalink_url(&self) -> String {
        format!("https://www.reddit.com{}", self.permalink)
    }
}

#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait RedditPort {
    /// Newest submissions of a subreddit, newest first.
    async fn find_new_links(&self, subreddit: &str) -> Result<Vec<Link>, RedditError>;
}

#[derive(Debug, Error)]
pub enum RedditError {
    #[error("Reddit is unavailable")]
    RedditUnavailable,
    #[error("Subreddit {0} not found")]
    SubredditNotFound(String),
}
