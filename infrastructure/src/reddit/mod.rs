mod listing;

use crate::reddit::listing::parse_listing;
use async_trait::async_trait;
use domain::ports::reddit::{Link, RedditError, RedditPort};
use reqwest::{Client as HttpClient, StatusCode};
use tracing::{instrument, warn};

const LINKS_PER_REQUEST: usize = 25;

/// Reads the public JSON listings of reddit.com.
pub struct RedditAdapter {
    http_client: HttpClient,
}

impl RedditAdapter {
    #[instrument(level = "trace", skip_all)]
    pub fn new(user_agent: &str) -> Result<Self, reqwest::Error> {
        let http_client = HttpClient::builder().user_agent(user_agent).build()?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl RedditPort for RedditAdapter {
    #[instrument(level = "debug", skip(self))]
    async fn find_new_links(&self, subreddit: &str) -> Result<Vec<Link>, RedditError> {
        let response = self
            .http_client
            .get(format!("https://www.reddit.com/r/{}/new.json", subreddit))
            .query(&[
                ("limit", LINKS_PER_REQUEST.to_string()),
                ("raw_json", "1".to_string()),
            ])
            .send()
            .await
            .map_err(|err| {
                warn!("Failed to fetch subreddit listing: {:?}", err);
                RedditError::RedditUnavailable
            })?;

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::FORBIDDEN => {
                return Err(RedditError::SubredditNotFound(subreddit.to_string()));
            }
            status if !status.is_success() => {
                warn!(status = status.as_u16(), "Reddit answered with an error");
                return Err(RedditError::RedditUnavailable);
            }
            _ => {}
        }

        let listing = response.text().await.map_err(|err| {
            warn!("Failed to read subreddit listing: {:?}", err);
            RedditError::RedditUnavailable
        })?;

        parse_listing(&listing).map_err(|err| {
            warn!("Failed to parse subreddit listing: {:?}", err);
            RedditError::SubredditNotFound(subreddit.to_string())
        })
    }
}
