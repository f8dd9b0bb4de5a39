use crate::command::dev::{failsafe, kill, rank, say, status};
use crate::command::guild::assign;
use crate::command::moderation::{assignable_role, blacklist, reddit, reddit_legacy, response};
use crate::command::utility::{math, support};
use crate::command::{Command, CommandContext, CommandError, GuildCommandContext};
use std::collections::HashMap;
use tracing::{debug, instrument};

pub type CommandFactory = fn(CommandContext) -> Result<Box<dyn Command>, CommandError>;
pub type GuildCommandFactory = fn(GuildCommandContext) -> Result<Box<dyn Command>, CommandError>;

/// Qualified command name to constructor.
pub struct CommandTable<F> {
    factories: HashMap<&'static str, F>,
}

impl<F: Copy> CommandTable<F> {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    pub fn bind(mut self, qualified_name: &'static str, factory: F) -> Self {
        self.factories.insert(qualified_name, factory);
        self
    }

    pub fn get(&self, qualified_name: &str) -> Option<F> {
        self.factories.get(qualified_name).copied()
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl<F: Copy> Default for CommandTable<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds commands from events.
///
/// Events from a guild are looked up in the guild table first and fall back to
/// the general table. Private events only see the general table.
pub struct CommandProvider {
    general: CommandTable<CommandFactory>,
    guild: CommandTable<GuildCommandFactory>,
}

impl CommandProvider {
    pub fn new(general: CommandTable<CommandFactory>, guild: CommandTable<GuildCommandFactory>) -> Self {
        Self { general, guild }
    }

    #[instrument(level = "debug", skip_all, fields(qualified_name))]
    pub fn create(&self, context: CommandContext) -> Result<Option<Box<dyn Command>>, CommandError> {
        let qualified_name = context.event.qualified_name();
        tracing::Span::current().record("qualified_name", qualified_name.as_str());

        if let Some(guild_id) = context.event.guild_id {
            if let Some(factory) = self.guild.get(&qualified_name) {
                debug!("Creating guild command");
                return factory(GuildCommandContext { guild_id, context }).map(Some);
            }
        }

        match self.general.get(&qualified_name) {
            Some(factory) => {
                debug!("Creating general command");
                factory(context).map(Some)
            }
            None => Ok(None),
        }
    }

    pub fn general_names(&self) -> Vec<&'static str> {
        self.general.names()
    }

    pub fn guild_names(&self) -> Vec<&'static str> {
        self.guild.names()
    }
}

impl Default for CommandProvider {
    fn default() -> Self {
        let general = CommandTable::<CommandFactory>::new()
            .bind("math", math::create)
            .bind("support", support::create)
            .bind("dev.failsafe", failsafe::create)
            .bind("dev.kill", kill::create)
            .bind("dev.rank", rank::create)
            .bind("dev.say", say::create)
            .bind("dev.status", status::create);

        let guild = CommandTable::<GuildCommandFactory>::new()
            .bind("assign", assign::create)
            .bind("mod.assign.add", assignable_role::create_add)
            .bind("mod.assign.remove", assignable_role::create_remove)
            .bind("mod.blacklist.add", blacklist::create_add)
            .bind("mod.blacklist.remove", blacklist::create_remove)
            .bind("mod.blacklist.info", blacklist::create_info)
            .bind("mod.response.add", response::create_add)
            .bind("mod.response.remove", response::create_remove)
            .bind("mod.response.info", response::create_info)
            .bind("mod.reddit.add", reddit::create_add)
            .bind("mod.reddit.remove", reddit::create_remove)
            .bind("mod.reddit.info", reddit::create_info)
            .bind("mod.reddit_legacy.add", reddit_legacy::create_add)
            .bind("mod.reddit_legacy.remove", reddit_legacy::create_remove)
            .bind("mod.reddit_legacy.info", reddit_legacy::create_info);

        Self::new(general, guild)
    }
}
