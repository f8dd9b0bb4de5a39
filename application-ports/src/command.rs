use async_trait::async_trait;
use domain_shared::argument::Argument;
use domain_shared::discord::{ChannelId, GuildId, ReplyTarget, UserId};
use domain_shared::permission::PermissionSet;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub user_id: UserId,
    pub name: String,
    pub is_bot: bool,
}

/// A command invocation, either typed as a prefixed message or sent as a slash command.
#[derive(Debug, Clone)]
pub struct CommandEvent {
    pub name: String,
    pub subcommand_group: Option<String>,
    pub subcommand: Option<String>,
    /// Positional arguments of a text command.
    pub arguments: Vec<Argument>,
    /// Named options of a slash command.
    pub options: BTreeMap<String, Argument>,
    pub author: Author,
    pub guild_id: Option<GuildId>,
    pub channel_id: ChannelId,
    /// Permissions of the author in `channel_id`.
    pub member_permissions: PermissionSet,
    pub reply_target: ReplyTarget,
}

impl CommandEvent {
    pub fn qualified_name(&self) -> String {
        qualified_name(
            &self.name,
            self.subcommand_group.as_deref(),
            self.subcommand.as_deref(),
        )
    }
}

/// Joins the present parts with `.`, e.g. `mod.blacklist.add`.
pub fn qualified_name(name: &str, subcommand_group: Option<&str>, subcommand: Option<&str>) -> String {
    [Some(name), subcommand_group, subcommand]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(".")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The author is a bot.
    Filtered,
    /// No command is registered under the qualified name.
    Dropped,
    /// Construction, authorization or validation failed and the author was told.
    Rejected,
    /// Handed to the worker pool.
    Submitted,
}

#[async_trait]
pub trait CommandDispatcherPort {
    async fn dispatch(&self, event: CommandEvent) -> DispatchOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_name_joins_present_parts() {
        assert_eq!(qualified_name("math", None, None), "math");
        assert_eq!(qualified_name("dev", None, Some("kill")), "dev.kill");
        assert_eq!(
            qualified_name("mod", Some("blacklist"), Some("add")),
            "mod.blacklist.add"
        );
    }
}
