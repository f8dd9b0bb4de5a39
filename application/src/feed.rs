use async_trait::async_trait;
use domain::feed::{link_message, SubredditListener};
use domain::ports::discord::{DiscordError, DiscordPort};
use domain::ports::reddit::Link;
use domain_shared::discord::{ChannelId, WebhookId};
use std::sync::Arc;
use tracing::instrument;

/// Where the links of a subreddit are relayed to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum FeedTarget {
    TextChannel(ChannelId),
    Webhook { webhook_id: WebhookId, url: String },
}

pub struct TextChannelSubredditListener {
    discord_port: Arc<dyn DiscordPort + Send + Sync>,
    channel_id: ChannelId,
}

#[async_trait]
impl SubredditListener for TextChannelSubredditListener {
    #[instrument(level = "debug", skip_all, fields(channel_id = self.channel_id.0, link = %link.id))]
    async fn on_link(&self, link: &Link) -> Result<(), DiscordError> {
        self.discord_port
            .send_message(self.channel_id, link_message(link))
            .await
            .map(|_| ())
    }
}

pub struct WebhookSubredditListener {
    discord_port: Arc<dyn DiscordPort + Send + Sync>,
    url: String,
}

#[async_trait]
impl SubredditListener for WebhookSubredditListener {
    #[instrument(level = "debug", skip_all, fields(link = %link.id))]
    async fn on_link(&self, link: &Link) -> Result<(), DiscordError> {
        self.discord_port
            .execute_webhook(&self.url, link_message(link))
            .await
    }
}

pub fn create_listener(
    discord_port: Arc<dyn DiscordPort + Send + Sync>,
    target: &FeedTarget,
) -> Box<dyn SubredditListener + Send + Sync> {
    match target {
        FeedTarget::TextChannel(channel_id) => Box::new(TextChannelSubredditListener {
            discord_port,
            channel_id: *channel_id,
        }),
        FeedTarget::Webhook { url, .. } => Box::new(WebhookSubredditListener {
            discord_port,
            url: url.clone(),
        }),
    }
}
