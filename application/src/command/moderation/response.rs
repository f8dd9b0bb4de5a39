use crate::command::error::map_discord_err;
use crate::command::moderation::{compile_pattern, required_entry, Entry};
use crate::command::{Command, CommandError, GuildCommandContext};
use async_trait::async_trait;
use domain::argument::resolve_string;
use domain::guild::AutoResponse;
use domain::site::{paginate, Site};
use domain_shared::permission::{Permission, PermissionSet};
use tracing::{info, instrument};

fn permissions() -> PermissionSet {
    PermissionSet::from([Permission::ManageMessages])
}

/// Answers every message matching `pattern` with `answer`.
pub struct ResponseAddCommand {
    context: GuildCommandContext,
    pattern: String,
    answer: String,
}

pub fn create_add(context: GuildCommandContext) -> Result<Box<dyn Command>, CommandError> {
    let parameters = context.parameters();
    let pattern = parameters.required("pattern", 0, resolve_string)?;
    let answer = parameters.remaining("answer", 1, resolve_string)?.join(" ");

    Ok(Box::new(ResponseAddCommand {
        context,
        pattern,
        answer,
    }))
}

#[async_trait]
impl Command for ResponseAddCommand {
    fn permissions(&self) -> PermissionSet {
        permissions()
    }

    fn validate(&self) -> Result<(), CommandError> {
        if self.answer.trim().is_empty() {
            return Err(CommandError::InvalidArgument(
                "The answer must not be empty".to_string(),
            ));
        }
        compile_pattern(&self.pattern).map(|_| ())
    }

    #[instrument(level = "info", skip(self), fields(guild_id = self.context.guild_id.0))]
    async fn run(&self) -> Result<(), CommandError> {
        let mut guild = self.context.load_guild().await?;
        match guild
            .auto_responses
            .iter_mut()
            .find(|response| response.pattern == self.pattern)
        {
            Some(response) => response.answer = self.answer.clone(),
            None => guild.auto_responses.push(AutoResponse {
                pattern: self.pattern.clone(),
                answer: self.answer.clone(),
            }),
        }
        self.context.store_guild(&guild).await?;
        self.context
            .services
            .auto_response_cache
            .invalidate(self.context.guild_id);
        info!(pattern = %self.pattern, "Auto-response added");

        self.context
            .reply
            .info(format!("Messages matching `{}` will be answered.", self.pattern))
            .await
            .map_err(map_discord_err)?;
        Ok(())
    }
}

pub struct ResponseRemoveCommand {
    context: GuildCommandContext,
    entry: Entry,
}

pub fn create_remove(context: GuildCommandContext) -> Result<Box<dyn Command>, CommandError> {
    let entry = required_entry(&context, &["index", "pattern"])?;

    Ok(Box::new(ResponseRemoveCommand { context, entry }))
}

#[async_trait]
impl Command for ResponseRemoveCommand {
    fn permissions(&self) -> PermissionSet {
        permissions()
    }

    #[instrument(level = "info", skip(self), fields(guild_id = self.context.guild_id.0))]
    async fn run(&self) -> Result<(), CommandError> {
        let mut guild = self.context.load_guild().await?;
        let patterns = guild
            .auto_responses
            .iter()
            .map(|response| response.pattern.as_str());
        let Some(position) = self.entry.position(patterns) else {
            return Err(CommandError::InvalidArgument(
                "No such auto-response".to_string(),
            ));
        };

        let removed = guild.auto_responses.remove(position);
        self.context.store_guild(&guild).await?;
        self.context
            .services
            .auto_response_cache
            .invalidate(self.context.guild_id);
        info!(pattern = %removed.pattern, "Auto-response removed");

        self.context
            .reply
            .info(format!("Messages matching `{}` are no longer answered.", removed.pattern))
            .await
            .map_err(map_discord_err)?;
        Ok(())
    }
}

pub struct ResponseInfoCommand {
    context: GuildCommandContext,
}

pub fn create_info(context: GuildCommandContext) -> Result<Box<dyn Command>, CommandError> {
    Ok(Box::new(ResponseInfoCommand { context }))
}

#[async_trait]
impl Command for ResponseInfoCommand {
    fn permissions(&self) -> PermissionSet {
        permissions()
    }

    async fn run(&self) -> Result<(), CommandError> {
        let guild = self.context.load_guild().await?;
        let entries: Vec<_> = guild
            .auto_responses
            .iter()
            .map(|response| format!("`{}` → {}", response.pattern, response.answer))
            .collect();

        match Site::new(
            paginate("Auto-responses", &entries),
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
                    .info("There are no auto-responses.")
                    .await
                    .map_err(map_discord_err)?;
                Ok(())
            }
        }
    }
}
