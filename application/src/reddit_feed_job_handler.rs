use crate::feed::{create_listener, FeedTarget};
use application_ports::reddit_feed_job_handler::{
    RedditFeedJobHandlerError, RedditFeedJobHandlerPort,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::guild::{GuildRepository, GuildRepositoryError};
use domain::ports::discord::DiscordPort;
use domain::ports::reddit::{Link, RedditError, RedditPort};
use domain::webhook::{WebhookRepository, WebhookRepositoryError};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

/// Newest relayed timestamp of a subreddit and the ids relayed at that timestamp.
#[derive(Debug, Clone)]
struct FeedCursor {
    newest: DateTime<Utc>,
    relayed: HashSet<String>,
}

impl FeedCursor {
    fn new(newest: DateTime<Utc>) -> Self {
        Self {
            newest,
            relayed: HashSet::new(),
        }
    }

    fn is_fresh(&self, link: &Link) -> bool {
        link.created_at > self.newest
            || (link.created_at == self.newest && !self.relayed.contains(&link.id))
    }

    fn advance(&mut self, link: &Link) {
        if link.created_at > self.newest {
            self.newest = link.created_at;
            self.relayed.clear();
        }
        self.relayed.insert(link.id.clone());
    }
}

/// Relays links newer than the last relayed one of each subreddit.
///
/// Links created before the handler started are never relayed.
pub struct RedditFeedJobHandler {
    discord_port: Arc<dyn DiscordPort + Send + Sync>,
    reddit_port: Arc<dyn RedditPort + Send + Sync>,
    guild_repository: Arc<dyn GuildRepository + Send + Sync>,
    webhook_repository: Arc<dyn WebhookRepository + Send + Sync>,
    started_at: DateTime<Utc>,
    cursors: Mutex<HashMap<String, FeedCursor>>,
}

impl RedditFeedJobHandler {
    #[instrument(level = "trace", skip_all)]
    pub fn new(
        discord_port: Arc<dyn DiscordPort + Send + Sync>,
        reddit_port: Arc<dyn RedditPort + Send + Sync>,
        guild_repository: Arc<dyn GuildRepository + Send + Sync>,
        webhook_repository: Arc<dyn WebhookRepository + Send + Sync>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            discord_port,
            reddit_port,
            guild_repository,
            webhook_repository,
            started_at,
            cursors: Mutex::new(HashMap::new()),
        }
    }

    #[instrument(level = "debug", skip(self))]
    async fn subscriptions(
        &self,
    ) -> Result<BTreeMap<String, BTreeSet<FeedTarget>>, RedditFeedJobHandlerError> {
        let (guilds, webhooks) = tokio::try_join!(
            async {
                self.guild_repository
                    .find_all()
                    .await
                    .map_err(map_guild_repo_err)
            },
            async {
                self.webhook_repository
                    .find_all()
                    .await
                    .map_err(map_webhook_repo_err)
            }
        )?;

        let mut subscriptions: BTreeMap<String, BTreeSet<FeedTarget>> = BTreeMap::new();

        for channel in guilds.into_iter().flat_map(|guild| guild.text_channels) {
            for subreddit in channel.subreddits {
                subscriptions
                    .entry(subreddit.to_lowercase())
                    .or_default()
                    .insert(FeedTarget::TextChannel(channel.channel_id));
            }
        }

        for webhook in webhooks {
            for subreddit in &webhook.subreddits {
                subscriptions
                    .entry(subreddit.to_lowercase())
                    .or_default()
                    .insert(FeedTarget::Webhook {
                        webhook_id: webhook.webhook_id,
                        url: webhook.url.clone(),
                    });
            }
        }

        Ok(subscriptions)
    }

    #[instrument(level = "info", skip(self, targets))]
    async fn relay(
        &self,
        subreddit: &str,
        targets: &BTreeSet<FeedTarget>,
    ) -> Result<(), RedditFeedJobHandlerError> {
        let links = match self.reddit_port.find_new_links(subreddit).await {
            Ok(links) => links,
            Err(RedditError::SubredditNotFound(_)) => {
                warn!("Subscribed subreddit does not exist");
                return Ok(());
            }
            Err(RedditError::RedditUnavailable) => {
                error!("RedditError::RedditUnavailable");
                return Err(RedditFeedJobHandlerError::TemporaryUnavailable);
            }
        };

        let mut cursors = self.cursors.lock().await;
        let cursor = cursors
            .entry(subreddit.to_string())
            .or_insert_with(|| FeedCursor::new(self.started_at));

        let mut fresh: Vec<_> = links
            .into_iter()
            .filter(|link| cursor.is_fresh(link))
            .collect();
        if fresh.is_empty() {
            debug!("No new links");
            return Ok(());
        }
        fresh.sort_by_key(|link| link.created_at);

        let listeners: Vec<_> = targets
            .iter()
            .map(|target| create_listener(self.discord_port.clone(), target))
            .collect();

        for link in &fresh {
            for listener in &listeners {
                if let Err(error) = listener.on_link(link).await {
                    warn!(link = %link.id, error = %error, "Could not relay link");
                }
            }
            cursor.advance(link);
        }

        info!(links = fresh.len(), targets = targets.len(), "Relayed new links");
        Ok(())
    }
}

#[async_trait]
impl RedditFeedJobHandlerPort for RedditFeedJobHandler {
    #[instrument(level = "debug", skip(self))]
    async fn tick(&self) -> Result<(), RedditFeedJobHandlerError> {
        let subscriptions = self.subscriptions().await?;
        if subscriptions.is_empty() {
            return Err(RedditFeedJobHandlerError::NoSubscriptions);
        }

        let mut failed = 0;
        for (subreddit, targets) in &subscriptions {
            if let Err(error) = self.relay(subreddit, targets).await {
                warn!(subreddit = %subreddit, error = %error, "Subreddit skipped this tick");
                failed += 1;
            }
        }

        if failed > 0 {
            return Err(RedditFeedJobHandlerError::TemporaryUnavailable);
        }
        Ok(())
    }
}

#[instrument(level = "trace", skip_all)]
fn map_guild_repo_err(err: GuildRepositoryError) -> RedditFeedJobHandlerError {
    match err {
        GuildRepositoryError::ServiceUnavailable => {
            error!("GuildRepositoryError::ServiceUnavailable");
            RedditFeedJobHandlerError::TemporaryUnavailable
        }
    }
}

#[instrument(level = "trace", skip_all)]
fn map_webhook_repo_err(err: WebhookRepositoryError) -> RedditFeedJobHandlerError {
    match err {
        WebhookRepositoryError::ServiceUnavailable => {
            error!("WebhookRepositoryError::ServiceUnavailable");
            RedditFeedJobHandlerError::TemporaryUnavailable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::InMemoryGuildRepository;
    use chrono::Duration;
    use domain::guild::GuildEntity;
    use domain::ports::discord::MockDiscordPort;
    use domain::ports::reddit::MockRedditPort;
    use domain::webhook::{MockWebhookRepository, WebhookEntity};
    use domain_shared::discord::{ChannelId, GuildId, MessageId, WebhookId};

    fn link(id: &str, created_at: DateTime<Utc>) -> Link {
        Link {
            id: id.to_string(),
            subreddit: "rust".to_string(),
            title: id.to_string(),
            author: "ferris".to_string(),
            permalink: format!("/r/rust/comments/{id}/"),
            url: None,
            nsfw: false,
            created_at,
        }
    }

    fn guilds() -> InMemoryGuildRepository {
        let mut guild = GuildEntity::new(GuildId(1));
        guild
            .text_channel_mut(ChannelId(10))
            .subreddits
            .push("Rust".to_string());
        InMemoryGuildRepository::with(guild)
    }

    fn webhooks() -> MockWebhookRepository {
        let mut repository = MockWebhookRepository::new();
        repository.expect_find_all().returning(|| {
            Ok(vec![WebhookEntity {
                webhook_id: WebhookId(5),
                guild_id: GuildId(1),
                channel_id: ChannelId(11),
                name: "Reddit".to_string(),
                url: "https://discord.com/api/webhooks/5/token".to_string(),
                subreddits: vec!["rust".to_string()],
            }])
        });
        repository
    }

    #[tokio::test]
    async fn relays_links_newer_than_start_once() {
        let started_at = Utc::now();
        let mut reddit_port = MockRedditPort::new();
        reddit_port.expect_find_new_links().returning(move |_| {
            Ok(vec![
                link("new", started_at + Duration::minutes(1)),
                link("old", started_at - Duration::minutes(1)),
            ])
        });
        let mut discord_port = MockDiscordPort::new();
        discord_port
            .expect_send_message()
            .times(1)
            .returning(|_, _| Ok(MessageId(1)));
        discord_port
            .expect_execute_webhook()
            .times(1)
            .returning(|_, _| Ok(()));
        let handler = RedditFeedJobHandler::new(
            Arc::new(discord_port),
            Arc::new(reddit_port),
            Arc::new(guilds()),
            Arc::new(webhooks()),
            started_at,
        );

        handler.tick().await.unwrap();
        handler.tick().await.unwrap();
    }

    #[tokio::test]
    async fn failing_subreddit_does_not_starve_the_others() {
        let started_at = Utc::now();
        let mut guild = GuildEntity::new(GuildId(1));
        guild
            .text_channel_mut(ChannelId(10))
            .subreddits
            .extend(["aaa_flaky".to_string(), "rust".to_string()]);
        let mut reddit_port = MockRedditPort::new();
        reddit_port
            .expect_find_new_links()
            .withf(|subreddit| subreddit == "aaa_flaky")
            .returning(|_| Err(RedditError::RedditUnavailable));
        reddit_port
            .expect_find_new_links()
            .withf(|subreddit| subreddit == "rust")
            .returning(move |_| Ok(vec![link("fresh", started_at + Duration::minutes(1))]));
        let mut discord_port = MockDiscordPort::new();
        discord_port
            .expect_send_message()
            .times(1)
            .returning(|_, _| Ok(MessageId(1)));
        let mut webhook_repository = MockWebhookRepository::new();
        webhook_repository.expect_find_all().returning(|| Ok(vec![]));
        let handler = RedditFeedJobHandler::new(
            Arc::new(discord_port),
            Arc::new(reddit_port),
            Arc::new(InMemoryGuildRepository::with(guild)),
            Arc::new(webhook_repository),
            started_at,
        );

        for _ in 0..3 {
            assert!(matches!(
                handler.tick().await,
                Err(RedditFeedJobHandlerError::TemporaryUnavailable)
            ));
        }
    }

    #[tokio::test]
    async fn late_link_of_the_same_second_is_relayed() {
        let started_at = Utc::now();
        let second = started_at + Duration::minutes(1);
        let polls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let mut reddit_port = MockRedditPort::new();
        reddit_port.expect_find_new_links().returning(move |_| {
            if polls.fetch_add(1, std::sync::atomic::Ordering::SeqCst) == 0 {
                Ok(vec![link("first", second)])
            } else {
                Ok(vec![link("late", second), link("first", second)])
            }
        });
        let mut discord_port = MockDiscordPort::new();
        discord_port
            .expect_send_message()
            .times(2)
            .returning(|_, _| Ok(MessageId(1)));
        let mut webhook_repository = MockWebhookRepository::new();
        webhook_repository.expect_find_all().returning(|| Ok(vec![]));
        let handler = RedditFeedJobHandler::new(
            Arc::new(discord_port),
            Arc::new(reddit_port),
            Arc::new(guilds()),
            Arc::new(webhook_repository),
            started_at,
        );

        handler.tick().await.unwrap();
        handler.tick().await.unwrap();
        handler.tick().await.unwrap();
    }

    #[tokio::test]
    async fn nothing_to_do_without_subscriptions() {
        let mut webhook_repository = MockWebhookRepository::new();
        webhook_repository.expect_find_all().returning(|| Ok(vec![]));
        let handler = RedditFeedJobHandler::new(
            Arc::new(MockDiscordPort::new()),
            Arc::new(MockRedditPort::new()),
            Arc::new(InMemoryGuildRepository::default()),
            Arc::new(webhook_repository),
            Utc::now(),
        );

        let result = handler.tick().await;

        assert!(matches!(result, Err(RedditFeedJobHandlerError::NoSubscriptions)));
    }

    #[tokio::test]
    async fn reddit_outage_is_temporary() {
        let mut reddit_port = MockRedditPort::new();
        reddit_port
            .expect_find_new_links()
            .returning(|_| Err(RedditError::RedditUnavailable));
        let handler = RedditFeedJobHandler::new(
            Arc::new(MockDiscordPort::new()),
            Arc::new(reddit_port),
            Arc::new(guilds()),
            Arc::new(webhooks()),
            Utc::now(),
        );

        let result = handler.tick().await;

        assert!(matches!(
            result,
            Err(RedditFeedJobHandlerError::TemporaryUnavailable)
        ));
    }
}
