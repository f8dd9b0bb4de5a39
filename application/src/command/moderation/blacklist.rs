use crate::command::error::map_discord_err;
use crate::command::moderation::{compile_pattern, required_entry, Entry};
use crate::command::{Command, CommandError, GuildCommandContext};
use async_trait::async_trait;
use domain::argument::resolve_string;
use domain::site::{paginate, Site};
use domain_shared::permission::{Permission, PermissionSet};
use tracing::{info, instrument};

fn permissions() -> PermissionSet {
    PermissionSet::from([Permission::ManageMessages])
}

pub struct BlacklistAddCommand {
    context: GuildCommandContext,
    pattern: String,
}

pub fn create_add(context: GuildCommandContext) -> Result<Box<dyn Command>, CommandError> {
    let pattern = context.parameters().required("pattern", 0, resolve_string)?;

    Ok(Box::new(BlacklistAddCommand { context, pattern }))
}

#[async_trait]
impl Command for BlacklistAddCommand {
    fn permissions(&self) -> PermissionSet {
        permissions()
    }

    fn validate(&self) -> Result<(), CommandError> {
        compile_pattern(&self.pattern).map(|_| ())
    }

    #[instrument(level = "info", skip(self), fields(guild_id = self.context.guild_id.0))]
    async fn run(&self) -> Result<(), CommandError> {
        let mut guild = self.context.load_guild().await?;
        if !guild.blacklist.contains(&self.pattern) {
            guild.blacklist.push(self.pattern.clone());
        }
        self.context.store_guild(&guild).await?;
        self.context
            .services
            .pattern_cache
            .invalidate(self.context.guild_id);
        info!(pattern = %self.pattern, "Pattern blacklisted");

        self.context
            .reply
            .info(format!("Blacklisted `{}`.", self.pattern))
            .await
            .map_err(map_discord_err)?;
        Ok(())
    }
}

pub struct BlacklistRemoveCommand {
    context: GuildCommandContext,
    entry: Entry,
}

pub fn create_remove(context: GuildCommandContext) -> Result<Box<dyn Command>, CommandError> {
    let entry = required_entry(&context, &["index", "pattern"])?;

    Ok(Box::new(BlacklistRemoveCommand { context, entry }))
}

#[async_trait]
impl Command for BlacklistRemoveCommand {
    fn permissions(&self) -> PermissionSet {
        permissions()
    }

    #[instrument(level = "info", skip(self), fields(guild_id = self.context.guild_id.0))]
    async fn run(&self) -> Result<(), CommandError> {
        let mut guild = self.context.load_guild().await?;
        let Some(position) = self
            .entry
            .position(guild.blacklist.iter().map(String::as_str))
        else {
            return Err(CommandError::InvalidArgument(
                "No such blacklist entry".to_string(),
            ));
        };

        let pattern = guild.blacklist.remove(position);
        self.context.store_guild(&guild).await?;
        self.context
            .services
            .pattern_cache
            .invalidate(self.context.guild_id);
        info!(pattern = %pattern, "Pattern removed from blacklist");

        self.context
            .reply
            .info(format!("`{}` is no longer blacklisted.", pattern))
            .await
            .map_err(map_discord_err)?;
        Ok(())
    }
}

pub struct BlacklistInfoCommand {
    context: GuildCommandContext,
}

pub fn create_info(context: GuildCommandContext) -> Result<Box<dyn Command>, CommandError> {
    Ok(Box::new(BlacklistInfoCommand { context }))
}

#[async_trait]
impl Command for BlacklistInfoCommand {
    fn permissions(&self) -> PermissionSet {
        permissions()
    }

    #[instrument(level = "info", skip(self), fields(guild_id = self.context.guild_id.0))]
    async fn run(&self) -> Result<(), CommandError> {
        let guild = self.context.load_guild().await?;
        let entries: Vec<_> = guild
            .blacklist
            .iter()
            .map(|pattern| format!("`{}`", pattern))
            .collect();

        match Site::new(
            paginate("Blacklist", &entries),
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
                    .info("The blacklist is empty.")
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
    use crate::test_support::{guild_context, InMemoryGuildRepository, TestServices, GUILD_ID};
    use domain_shared::argument::Argument;
    use domain::guild::GuildEntity;
    use domain_shared::discord::MessageId;
    use std::sync::Arc;

    fn replying(mut services: TestServices) -> TestServices {
        services
            .discord_port
            .expect_reply()
            .returning(|_, _| Ok(MessageId(1)));
        services
    }

    #[tokio::test]
    async fn add_to_empty_blacklist_persists_and_invalidates_once() {
        let mut services = replying(TestServices::new());
        let guilds = services.guild_repository.clone();
        services
            .pattern_cache
            .expect_invalidate()
            .withf(|guild_id| *guild_id == GUILD_ID)
            .times(1)
            .return_const(());

        let command = create_add(guild_context(services, "mod.blacklist.add", &["foo"])).unwrap();
        command.validate().unwrap();
        command.run().await.unwrap();

        assert_eq!(guilds.stored(GUILD_ID).unwrap().blacklist, vec!["foo"]);
        assert_eq!(guilds.puts(), 1);
    }

    #[tokio::test]
    async fn adding_twice_does_not_duplicate() {
        let mut guild = GuildEntity::new(GUILD_ID);
        guild.blacklist = vec!["foo".to_string()];
        let mut services = replying(TestServices::new());
        services.guild_repository = Arc::new(InMemoryGuildRepository::with(guild));
        let guilds = services.guild_repository.clone();
        services.pattern_cache.expect_invalidate().times(1).return_const(());

        let command = create_add(guild_context(services, "mod.blacklist.add", &["foo"])).unwrap();
        command.run().await.unwrap();

        assert_eq!(guilds.stored(GUILD_ID).unwrap().blacklist, vec!["foo"]);
    }

    #[test]
    fn invalid_patterns_are_rejected() {
        let command = create_add(guild_context(TestServices::new(), "mod.blacklist.add", &["("])).unwrap();

        assert!(matches!(
            command.validate(),
            Err(CommandError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn remove_by_pattern_and_by_index() {
        let mut guild = GuildEntity::new(GUILD_ID);
        guild.blacklist = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let mut services = TestServices::new();
        services.guild_repository = Arc::new(InMemoryGuildRepository::with(guild));
        let guilds = services.guild_repository.clone();
        services.pattern_cache.expect_invalidate().times(1).return_const(());
        let services = replying(services);

        let mut event_context = guild_context(services, "mod.blacklist.remove", &["b"]);
        let by_pattern = create_remove(event_context).unwrap();
        by_pattern.run().await.unwrap();
        assert_eq!(guilds.stored(GUILD_ID).unwrap().blacklist, vec!["a", "c"]);

        let mut services = replying(TestServices::new());
        services.guild_repository = guilds.clone();
        services.pattern_cache.expect_invalidate().times(1).return_const(());
        event_context = guild_context(services, "mod.blacklist.remove", &[]);
        event_context.context.event.arguments = vec![Argument::from(0i64)];
        let by_index = create_remove(event_context).unwrap();
        by_index.run().await.unwrap();
        assert_eq!(guilds.stored(GUILD_ID).unwrap().blacklist, vec!["c"]);
    }

    #[tokio::test]
    async fn removing_unknown_entry_changes_nothing() {
        let mut guild = GuildEntity::new(GUILD_ID);
        guild.blacklist = vec!["a".to_string()];
        let mut services = TestServices::new();
        services.guild_repository = Arc::new(InMemoryGuildRepository::with(guild));
        let guilds = services.guild_repository.clone();

        let command = create_remove(guild_context(services, "mod.blacklist.remove", &["z"])).unwrap();
        let result = command.run().await;

        assert!(matches!(result, Err(CommandError::InvalidArgument(_))));
        assert_eq!(guilds.puts(), 0);
    }
}
