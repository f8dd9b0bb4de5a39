use crate::command::error::map_discord_err;
use crate::command::moderation::{normalize_subreddit, validate_subreddit};
use crate::command::{Command, CommandError, GuildCommandContext};
use async_trait::async_trait;
use domain::argument::{resolve_channel, resolve_string};
use domain::site::{paginate, Site};
use domain_shared::discord::ChannelId;
use domain_shared::permission::{Permission, PermissionSet};
use tracing::{info, instrument};

fn permissions() -> PermissionSet {
    PermissionSet::from([Permission::ManageChannels])
}

fn parameters(context: &GuildCommandContext) -> Result<(String, ChannelId), CommandError> {
    let parameters = context.parameters();
    let subreddit = normalize_subreddit(&parameters.required("subreddit", 0, resolve_string)?);
    let channel_id = parameters
        .optional("channel", 1, resolve_channel)?
        .unwrap_or(context.event.channel_id);

    Ok((subreddit, channel_id))
}

/// Relays a subreddit into a channel as plain bot messages.
pub struct RedditLegacyAddCommand {
    context: GuildCommandContext,
    subreddit: String,
    channel_id: ChannelId,
}

pub fn create_add(context: GuildCommandContext) -> Result<Box<dyn Command>, CommandError> {
    let (subreddit, channel_id) = parameters(&context)?;

    Ok(Box::new(RedditLegacyAddCommand {
        context,
        subreddit,
        channel_id,
    }))
}

#[async_trait]
impl Command for RedditLegacyAddCommand {
    fn permissions(&self) -> PermissionSet {
        permissions()
    }

    fn validate(&self) -> Result<(), CommandError> {
        validate_subreddit(&self.subreddit)
    }

    #[instrument(level = "info", skip(self), fields(guild_id = self.context.guild_id.0, channel_id = self.channel_id.0))]
    async fn run(&self) -> Result<(), CommandError> {
        let mut guild = self.context.load_guild().await?;
        let channel = guild.text_channel_mut(self.channel_id);
        if !channel.subreddits.contains(&self.subreddit) {
            channel.subreddits.push(self.subreddit.clone());
        }
        self.context.store_guild(&guild).await?;
        info!(subreddit = %self.subreddit, "Subreddit subscribed");

        self.context
            .reply
            .info(format!(
                "r/{} is now posted to {}.",
                self.subreddit,
                self.channel_id.mention()
            ))
            .await
            .map_err(map_discord_err)?;
        Ok(())
    }
}

pub struct RedditLegacyRemoveCommand {
    context: GuildCommandContext,
    subreddit: String,
    channel_id: ChannelId,
}

pub fn create_remove(context: GuildCommandContext) -> Result<Box<dyn Command>, CommandError> {
    let (subreddit, channel_id) = parameters(&context)?;

    Ok(Box::new(RedditLegacyRemoveCommand {
        context,
        subreddit,
        channel_id,
    }))
}

#[async_trait]
impl Command for RedditLegacyRemoveCommand {
    fn permissions(&self) -> PermissionSet {
        permissions()
    }

    #[instrument(level = "info", skip(self), fields(guild_id = self.context.guild_id.0, channel_id = self.channel_id.0))]
    async fn run(&self) -> Result<(), CommandError> {
        let mut guild = self.context.load_guild().await?;
        let subscribed = guild
            .text_channels
            .iter()
            .any(|channel| channel.channel_id == self.channel_id && channel.subreddits.contains(&self.subreddit));
        if !subscribed {
            return Err(CommandError::InvalidArgument(format!(
                "r/{} is not posted to {}",
                self.subreddit,
                self.channel_id.mention()
            )));
        }

        guild
            .text_channel_mut(self.channel_id)
            .subreddits
            .retain(|subreddit| *subreddit != self.subreddit);
        guild
            .text_channels
            .retain(|channel| !channel.subreddits.is_empty());
        self.context.store_guild(&guild).await?;
        info!(subreddit = %self.subreddit, "Subreddit unsubscribed");

        self.context
            .reply
            .info(format!(
                "r/{} is no longer posted to {}.",
                self.subreddit,
                self.channel_id.mention()
            ))
            .await
            .map_err(map_discord_err)?;
        Ok(())
    }
}

pub struct RedditLegacyInfoCommand {
    context: GuildCommandContext,
}

pub fn create_info(context: GuildCommandContext) -> Result<Box<dyn Command>, CommandError> {
    Ok(Box::new(RedditLegacyInfoCommand { context }))
}

#[async_trait]
impl Command for RedditLegacyInfoCommand {
    fn permissions(&self) -> PermissionSet {
        permissions()
    }

    async fn run(&self) -> Result<(), CommandError> {
        let guild = self.context.load_guild().await?;
        let entries: Vec<_> = guild
            .text_channels
            .iter()
            .flat_map(|channel| {
                channel
                    .subreddits
                    .iter()
                    .map(|subreddit| format!("r/{} → {}", subreddit, channel.channel_id.mention()))
            })
            .collect();

        match Site::new(
            paginate("Reddit channels", &entries),
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
                    .info("No subreddit is posted to a channel.")
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
    use crate::test_support::{guild_context, InMemoryGuildRepository, TestServices, CHANNEL_ID, GUILD_ID};
    use domain::guild::{GuildEntity, TextChannelEntity};
    use domain_shared::discord::MessageId;
    use std::sync::Arc;

    fn replying(services: &mut TestServices) {
        services
            .discord_port
            .expect_reply()
            .returning(|_, _| Ok(MessageId(1)));
    }

    #[tokio::test]
    async fn subscribes_the_current_channel_by_default() {
        let mut services = TestServices::new();
        replying(&mut services);
        let guilds = services.guild_repository.clone();

        create_add(guild_context(services, "mod.reddit_legacy.add", &["/r/Rust"]))
            .unwrap()
            .run()
            .await
            .unwrap();

        assert_eq!(
            guilds.stored(GUILD_ID).unwrap().text_channels,
            vec![TextChannelEntity {
                channel_id: CHANNEL_ID,
                subreddits: vec!["rust".to_string()],
            }]
        );
    }

    #[tokio::test]
    async fn explicit_channel_is_used() {
        let mut services = TestServices::new();
        replying(&mut services);
        let guilds = services.guild_repository.clone();

        create_add(guild_context(services, "mod.reddit_legacy.add", &["rust", "<#900>"]))
            .unwrap()
            .run()
            .await
            .unwrap();

        let guild = guilds.stored(GUILD_ID).unwrap();
        assert_eq!(guild.text_channels[0].channel_id, ChannelId(900));
    }

    #[tokio::test]
    async fn channel_without_subreddits_is_dropped() {
        let mut guild = GuildEntity::new(GUILD_ID);
        guild.text_channels = vec![TextChannelEntity {
            channel_id: CHANNEL_ID,
            subreddits: vec!["rust".to_string()],
        }];
        let mut services = TestServices::new();
        services.guild_repository = Arc::new(InMemoryGuildRepository::with(guild));
        replying(&mut services);
        let guilds = services.guild_repository.clone();

        create_remove(guild_context(services, "mod.reddit_legacy.remove", &["rust"]))
            .unwrap()
            .run()
            .await
            .unwrap();

        assert!(guilds.stored(GUILD_ID).unwrap().text_channels.is_empty());
    }
}
