use crate::command::error::{map_discord_err, map_webhook_repo_err};
use crate::command::moderation::{normalize_subreddit, validate_subreddit};
use crate::command::{Command, CommandError, GuildCommandContext};
use async_trait::async_trait;
use domain::argument::{resolve_channel, resolve_string};
use domain::ports::discord::DiscordError;
use domain::site::{paginate, Site};
use domain::webhook::WebhookEntity;
use domain_shared::discord::ChannelId;
use domain_shared::permission::{Permission, PermissionSet};
use tracing::{info, instrument, warn};

const WEBHOOK_NAME: &str = "Reddit";

fn permissions() -> PermissionSet {
    PermissionSet::from([Permission::ManageWebhooks])
}

fn parameters(context: &GuildCommandContext) -> Result<(String, ChannelId), CommandError> {
    let parameters = context.parameters();
    let subreddit = normalize_subreddit(&parameters.required("subreddit", 0, resolve_string)?);
    let channel_id = parameters
        .optional("channel", 1, resolve_channel)?
        .unwrap_or(context.event.channel_id);

    Ok((subreddit, channel_id))
}

async fn find_webhook(
    context: &GuildCommandContext,
    channel_id: ChannelId,
) -> Result<Option<WebhookEntity>, CommandError> {
    let webhooks = context
        .services
        .webhook_repository
        .find_by_guild(context.guild_id)
        .await
        .map_err(map_webhook_repo_err)?;

    Ok(webhooks
        .into_iter()
        .find(|webhook| webhook.channel_id == channel_id))
}

/// Relays a subreddit into a channel through a webhook owned by the bot.
pub struct RedditAddCommand {
    context: GuildCommandContext,
    subreddit: String,
    channel_id: ChannelId,
}

pub fn create_add(context: GuildCommandContext) -> Result<Box<dyn Command>, CommandError> {
    let (subreddit, channel_id) = parameters(&context)?;

    Ok(Box::new(RedditAddCommand {
        context,
        subreddit,
        channel_id,
    }))
}

#[async_trait]
impl Command for RedditAddCommand {
    fn permissions(&self) -> PermissionSet {
        permissions()
    }

    fn validate(&self) -> Result<(), CommandError> {
        validate_subreddit(&self.subreddit)
    }

    #[instrument(level = "info", skip(self), fields(guild_id = self.context.guild_id.0, channel_id = self.channel_id.0))]
    async fn run(&self) -> Result<(), CommandError> {
        let services = &self.context.services;

        let mut webhook = match find_webhook(&self.context, self.channel_id).await? {
            Some(webhook) => webhook,
            None => {
                let created = services
                    .discord_port
                    .create_webhook(self.channel_id, WEBHOOK_NAME)
                    .await
                    .map_err(map_discord_err)?;
                info!(webhook_id = created.webhook_id.0, "Webhook created");

                WebhookEntity {
                    webhook_id: created.webhook_id,
                    guild_id: self.context.guild_id,
                    channel_id: self.channel_id,
                    name: WEBHOOK_NAME.to_string(),
                    url: created.url,
                    subreddits: Vec::new(),
                }
            }
        };

        if !webhook.subreddits.contains(&self.subreddit) {
            webhook.subreddits.push(self.subreddit.clone());
        }
        services
            .webhook_repository
            .put(&webhook)
            .await
            .map_err(map_webhook_repo_err)?;
        info!(subreddit = %self.subreddit, "Subreddit subscribed");

        self.context
            .reply
            .info(format!(
                "r/{} is now relayed to {}.",
                self.subreddit,
                self.channel_id.mention()
            ))
            .await
            .map_err(map_discord_err)?;
        Ok(())
    }
}

/// Stops relaying a subreddit. The webhook goes away with its last subreddit.
pub struct RedditRemoveCommand {
    context: GuildCommandContext,
    subreddit: String,
    channel_id: ChannelId,
}

pub fn create_remove(context: GuildCommandContext) -> Result<Box<dyn Command>, CommandError> {
    let (subreddit, channel_id) = parameters(&context)?;

    Ok(Box::new(RedditRemoveCommand {
        context,
        subreddit,
        channel_id,
    }))
}

#[async_trait]
impl Command for RedditRemoveCommand {
    fn permissions(&self) -> PermissionSet {
        permissions()
    }

    #[instrument(level = "info", skip(self), fields(guild_id = self.context.guild_id.0, channel_id = self.channel_id.0))]
    async fn run(&self) -> Result<(), CommandError> {
        let services = &self.context.services;

        let webhook = find_webhook(&self.context, self.channel_id).await?;
        let Some(mut webhook) = webhook.filter(|webhook| webhook.subreddits.contains(&self.subreddit)) else {
            return Err(CommandError::InvalidArgument(format!(
                "r/{} is not relayed to {}",
                self.subreddit,
                self.channel_id.mention()
            )));
        };

        webhook.subreddits.retain(|subreddit| *subreddit != self.subreddit);
        if webhook.subreddits.is_empty() {
            match services.discord_port.delete_webhook(webhook.webhook_id).await {
                Ok(()) => {}
                Err(DiscordError::NotFound) => {
                    warn!(webhook_id = webhook.webhook_id.0, "Webhook already deleted");
                }
                Err(err) => return Err(map_discord_err(err)),
            }
            services
                .webhook_repository
                .delete(webhook.webhook_id)
                .await
                .map_err(map_webhook_repo_err)?;
            info!(webhook_id = webhook.webhook_id.0, "Webhook deleted");
        } else {
            services
                .webhook_repository
                .put(&webhook)
                .await
                .map_err(map_webhook_repo_err)?;
        }

        self.context
            .reply
            .info(format!(
                "r/{} is no longer relayed to {}.",
                self.subreddit,
                self.channel_id.mention()
            ))
            .await
            .map_err(map_discord_err)?;
        Ok(())
    }
}

pub struct RedditInfoCommand {
    context: GuildCommandContext,
}

pub fn create_info(context: GuildCommandContext) -> Result<Box<dyn Command>, CommandError> {
    Ok(Box::new(RedditInfoCommand { context }))
}

#[async_trait]
impl Command for RedditInfoCommand {
    fn permissions(&self) -> PermissionSet {
        permissions()
    }

    async fn run(&self) -> Result<(), CommandError> {
        let webhooks = self
            .context
            .services
            .webhook_repository
            .find_by_guild(self.context.guild_id)
            .await
            .map_err(map_webhook_repo_err)?;

        let entries: Vec<_> = webhooks
            .iter()
            .flat_map(|webhook| {
                webhook
                    .subreddits
                    .iter()
                    .map(|subreddit| format!("r/{} → {}", subreddit, webhook.channel_id.mention()))
            })
            .collect();

        match Site::new(
            paginate("Reddit feeds", &entries),
            self.context.event.author.user_id,
        ) {
            Some(site) => {
                self.context
                    .services
                    .site_cache
                    .open(&self.context.reply, site)
                    .await
            }
            None => {
                self.context
                    .reply
                    .info("No subreddit is relayed.")
                    .await
                    .map_err(map_discord_err)?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{guild_context, TestServices, CHANNEL_ID, GUILD_ID};
    use domain::ports::discord::Webhook;
    use domain_shared::discord::{MessageId, WebhookId};

    fn webhook(subreddits: &[&str]) -> WebhookEntity {
        WebhookEntity {
            webhook_id: WebhookId(5),
            guild_id: GUILD_ID,
            channel_id: CHANNEL_ID,
            name: WEBHOOK_NAME.to_string(),
            url: "https://discord.com/api/webhooks/5/token".to_string(),
            subreddits: subreddits.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn replying(services: &mut TestServices) {
        services
            .discord_port
            .expect_reply()
            .returning(|_, _| Ok(MessageId(1)));
    }

    #[tokio::test]
    async fn first_subscription_creates_a_webhook() {
        let mut services = TestServices::new();
        replying(&mut services);
        services
            .webhook_repository
            .expect_find_by_guild()
            .returning(|_| Ok(Vec::new()));
        services
            .discord_port
            .expect_create_webhook()
            .times(1)
            .withf(|channel_id, name| *channel_id == CHANNEL_ID && name == WEBHOOK_NAME)
            .returning(|_, _| {
                Ok(Webhook {
                    webhook_id: WebhookId(5),
                    url: "https://discord.com/api/webhooks/5/token".to_string(),
                })
            });
        services
            .webhook_repository
            .expect_put()
            .times(1)
            .withf(|entity| *entity == webhook(&["rust"]))
            .returning(|_| Ok(1));

        let command = create_add(guild_context(services, "mod.reddit.add", &["r/Rust"])).unwrap();
        command.validate().unwrap();
        command.run().await.unwrap();
    }

    #[tokio::test]
    async fn existing_webhook_is_reused() {
        let mut services = TestServices::new();
        replying(&mut services);
        services
            .webhook_repository
            .expect_find_by_guild()
            .returning(|_| Ok(vec![webhook(&["rust"])]));
        services.discord_port.expect_create_webhook().never();
        services
            .webhook_repository
            .expect_put()
            .times(1)
            .withf(|entity| entity.subreddits == vec!["rust", "golang"])
            .returning(|_| Ok(1));

        create_add(guild_context(services, "mod.reddit.add", &["golang"]))
            .unwrap()
            .run()
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn last_subreddit_takes_the_webhook_along() {
        let mut services = TestServices::new();
        replying(&mut services);
        services
            .webhook_repository
            .expect_find_by_guild()
            .returning(|_| Ok(vec![webhook(&["rust"])]));
        services
            .discord_port
            .expect_delete_webhook()
            .times(1)
            .returning(|_| Err(DiscordError::NotFound));
        services
            .webhook_repository
            .expect_delete()
            .times(1)
            .returning(|_| Ok(1));
        services.webhook_repository.expect_put().never();

        create_remove(guild_context(services, "mod.reddit.remove", &["rust"]))
            .unwrap()
            .run()
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unknown_subscription_is_refused() {
        let mut services = TestServices::new();
        services
            .webhook_repository
            .expect_find_by_guild()
            .returning(|_| Ok(vec![webhook(&["rust"])]));

        let result = create_remove(guild_context(services, "mod.reddit.remove", &["golang"]))
            .unwrap()
            .run()
            .await;

        assert!(matches!(result, Err(CommandError::InvalidArgument(_))));
    }
}
