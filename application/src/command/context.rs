use crate::command::error::map_guild_repo_err;
use crate::command::CommandError;
use crate::reply::ReplyChannel;
use crate::site::SiteCache;
use application_ports::command::CommandEvent;
use chrono::{DateTime, Utc};
use domain::argument::{required, resolve_many, Parameter, ResolutionError};
use domain::cache::{AutoResponseCache, PatternCache};
use domain::guard::MemberGuard;
use domain::guild::{GuildEntity, GuildRepository};
use domain::ports::discord::DiscordPort;
use domain::ports::lifecycle::LifecyclePort;
use domain::rank::RankLattice;
use domain::user::UserRepository;
use domain::webhook::WebhookRepository;
use domain_shared::argument::Argument;
use domain_shared::discord::{GuildId, InviteLink};
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CommandSettings {
    pub guard_timeout: Duration,
    pub support_invite: Option<InviteLink>,
    pub worker_threads: usize,
    pub started_at: DateTime<Utc>,
}

/// Everything a command may talk to. Built once at startup and shared.
pub struct CommandServices {
    pub discord_port: Arc<dyn DiscordPort + Send + Sync>,
    pub lifecycle_port: Arc<dyn LifecyclePort + Send + Sync>,
    pub guild_repository: Arc<dyn GuildRepository + Send + Sync>,
    pub user_repository: Arc<dyn UserRepository + Send + Sync>,
    pub webhook_repository: Arc<dyn WebhookRepository + Send + Sync>,
    pub pattern_cache: Arc<dyn PatternCache + Send + Sync>,
    pub auto_response_cache: Arc<dyn AutoResponseCache + Send + Sync>,
    pub site_cache: Arc<SiteCache>,
    pub member_guard: Arc<MemberGuard>,
    pub rank_lattice: Arc<RankLattice>,
    pub settings: CommandSettings,
}

pub struct CommandContext {
    pub event: CommandEvent,
    pub services: Arc<CommandServices>,
    pub reply: Arc<ReplyChannel>,
}

impl CommandContext {
    pub fn parameters(&self) -> Parameters<'_> {
        Parameters { event: &self.event }
    }
}

/// A [`CommandContext`] of an event that happened inside a guild.
pub struct GuildCommandContext {
    pub guild_id: GuildId,
    pub context: CommandContext,
}

impl GuildCommandContext {
    /// The stored configuration, or an empty one for guilds never configured.
    pub async fn load_guild(&self) -> Result<GuildEntity, CommandError> {
        let guild = self
            .services
            .guild_repository
            .get(self.guild_id)
            .await
            .map_err(map_guild_repo_err)?;

        Ok(guild.unwrap_or_else(|| GuildEntity::new(self.guild_id)))
    }

    pub async fn store_guild(&self, guild: &GuildEntity) -> Result<(), CommandError> {
        self.services
            .guild_repository
            .put(guild)
            .await
            .map_err(map_guild_repo_err)?;
        Ok(())
    }
}

impl Deref for GuildCommandContext {
    type Target = CommandContext;

    fn deref(&self) -> &Self::Target {
        &self.context
    }
}

/// Looks a parameter up by option name for slash commands and by position for text commands.
pub struct Parameters<'a> {
    event: &'a CommandEvent,
}

impl<'a> Parameters<'a> {
    pub fn optional<T, F>(&self, name: &str, index: usize, resolver: F) -> Result<Option<T>, ResolutionError>
    where
        F: Fn(&Argument) -> Option<T>,
    {
        match self.event.options.get(name) {
            Some(argument) => required(resolver)(argument).map(Some),
            None => Parameter::with_default(index).resolve(&self.event.arguments, resolver),
        }
    }

    pub fn required<T, F>(&self, name: &str, index: usize, resolver: F) -> Result<T, ResolutionError>
    where
        F: Fn(&Argument) -> Option<T>,
    {
        match self.event.options.get(name) {
            Some(argument) => required(resolver)(argument),
            None => Parameter::required(index)
                .resolve(&self.event.arguments, resolver)?
                .ok_or(ResolutionError::MissingArgument { index }),
        }
    }

    /// Every positional argument from `index` on, or the single named option.
    pub fn remaining<T, F>(&self, name: &str, index: usize, resolver: F) -> Result<Vec<T>, ResolutionError>
    where
        F: Fn(&Argument) -> Option<T>,
    {
        match self.event.options.get(name) {
            Some(argument) => resolve_many(std::slice::from_ref(argument), resolver),
            None => {
                let arguments = self.event.arguments.get(index..).unwrap_or_default();
                resolve_many(arguments, resolver)
            }
        }
    }

    /// The unresolved argument: the first present option of `names`, else the positional one.
    pub fn raw(&self, names: &[&str], index: usize) -> Option<&'a Argument> {
        names
            .iter()
            .find_map(|name| self.event.options.get(*name))
            .or_else(|| self.event.arguments.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::command_event;
    use domain::argument::{resolve_integer, resolve_string};

    fn slash_event() -> CommandEvent {
        let mut event = command_event("mod.blacklist.remove", &["positional"]);
        event.options.insert("pattern".to_string(), Argument::text("named"));
        event.options.insert("index".to_string(), Argument::from(3i64));
        event
    }

    fn raw_text(event: &CommandEvent, names: &[&str]) -> Option<String> {
        let argument = Parameters { event }.raw(names, 0)?;
        argument.as_string()
    }

    #[test]
    fn options_win_over_positions() {
        let event = slash_event();
        let parameters = Parameters { event: &event };

        assert_eq!(parameters.required("pattern", 0, resolve_string).unwrap(), "named");
        assert_eq!(parameters.optional("index", 5, resolve_integer).unwrap(), Some(3));
        assert_eq!(
            parameters.remaining("pattern", 0, resolve_string).unwrap(),
            vec!["named".to_string()]
        );
    }

    #[test]
    fn unresolvable_option_is_reported() {
        let mut event = command_event("dev.rank", &[]);
        event.options.insert("rank".to_string(), Argument::text("nope"));
        let parameters = Parameters { event: &event };

        assert!(matches!(
            parameters.required("rank", 0, resolve_integer),
            Err(ResolutionError::NoResolution(_))
        ));
    }

    #[test]
    fn raw_argument_outlives_the_lookup() {
        let event = slash_event();

        assert_eq!(raw_text(&event, &["index", "pattern"]).as_deref(), Some("3"));
        assert_eq!(raw_text(&event, &["missing"]).as_deref(), Some("positional"));
    }
}
