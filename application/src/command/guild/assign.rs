use crate::command::error::map_discord_err;
use crate::command::{Command, CommandError, GuildCommandContext};
use async_trait::async_trait;
use domain::argument::resolve_role;
use domain::ports::discord::RoleDiff;
use domain_shared::discord::RoleId;
use tracing::{info, instrument};

/// Toggles a self-assignable role on the author.
///
/// Taking a role drops the author's other roles of the same group.
pub struct AssignCommand {
    context: GuildCommandContext,
    role_id: RoleId,
}

pub fn create(context: GuildCommandContext) -> Result<Box<dyn Command>, CommandError> {
    let role_id = context.parameters().required("role", 0, resolve_role)?;

    Ok(Box::new(AssignCommand { context, role_id }))
}

#[async_trait]
impl Command for AssignCommand {
    #[instrument(level = "info", skip(self), fields(guild_id = self.context.guild_id.0, role_id = self.role_id.0))]
    async fn run(&self) -> Result<(), CommandError> {
        let guild_id = self.context.guild_id;
        let user_id = self.context.event.author.user_id;
        let services = &self.context.services;

        let guild = self.context.load_guild().await?;
        let Some(assignable) = guild.assignable_role(self.role_id) else {
            return Err(CommandError::InvalidArgument(format!(
                "{} is not self-assignable",
                self.role_id.mention()
            )));
        };

        let _permit = services
            .member_guard
            .acquire(user_id, services.settings.guard_timeout)
            .await?;

        let member_roles = services
            .discord_port
            .find_member_roles(guild_id, user_id)
            .await
            .map_err(map_discord_err)?;

        let mut role_diff = RoleDiff::default();
        let description = if member_roles.contains(&self.role_id) {
            role_diff.remove(self.role_id);
            format!("You no longer have {}.", self.role_id.mention())
        } else {
            guild
                .assignable_roles
                .iter()
                .filter(|role| role.group == assignable.group && role.role_id != self.role_id)
                .filter(|role| member_roles.contains(&role.role_id))
                .for_each(|role| role_diff.remove(role.role_id));
            role_diff.assign(self.role_id);
            format!(
                "You now have {} from the group {}.",
                self.role_id.mention(),
                assignable.group
            )
        };

        services
            .discord_port
            .apply_role_diff(guild_id, user_id, &role_diff, "Self-assigned role")
            .await
            .map_err(map_discord_err)?;
        info!(
            assigned = role_diff.to_assign.len(),
            removed = role_diff.to_remove.len(),
            "Roles changed"
        );

        self.context
            .reply
            .info(description)
            .await
            .map_err(map_discord_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandContext;
    use crate::reply::ReplyChannel;
    use crate::test_support::{command_event, InMemoryGuildRepository, TestServices, AUTHOR_ID, GUILD_ID};
    use domain::guard::GuardError;
    use domain::guild::{AssignableRole, GuildEntity};
    use domain_shared::discord::MessageId;
    use std::sync::Arc;
    use std::time::Duration;

    fn guild() -> GuildEntity {
        let mut guild = GuildEntity::new(GUILD_ID);
        guild.assignable_roles = vec![
            AssignableRole {
                role_id: RoleId(1),
                group: "color".to_string(),
            },
            AssignableRole {
                role_id: RoleId(2),
                group: "color".to_string(),
            },
            AssignableRole {
                role_id: RoleId(3),
                group: "ping".to_string(),
            },
        ];
        guild
    }

    fn command(services: TestServices, role: &str) -> Box<dyn Command> {
        let services = services.build();
        let event = command_event("assign", &[role]);
        let context = CommandContext {
            reply: Arc::new(ReplyChannel::new(
                services.discord_port.clone(),
                event.reply_target.clone(),
            )),
            services,
            event,
        };
        create(GuildCommandContext {
            guild_id: GUILD_ID,
            context,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn taking_a_role_drops_the_rest_of_its_group() {
        let mut services = TestServices::new();
        services.guild_repository = Arc::new(InMemoryGuildRepository::with(guild()));
        services
            .discord_port
            .expect_find_member_roles()
            .returning(|_, _| Ok(vec![RoleId(2), RoleId(3)]));
        services
            .discord_port
            .expect_apply_role_diff()
            .times(1)
            .withf(|_, user_id, role_diff, _| {
                *user_id == AUTHOR_ID
                    && role_diff.to_assign == vec![RoleId(1)]
                    && role_diff.to_remove == vec![RoleId(2)]
            })
            .returning(|_, _, _, _| Ok(()));
        services
            .discord_port
            .expect_reply()
            .times(1)
            .returning(|_, _| Ok(MessageId(1)));

        command(services, "<@&1>").run().await.unwrap();
    }

    #[tokio::test]
    async fn held_role_is_removed() {
        let mut services = TestServices::new();
        services.guild_repository = Arc::new(InMemoryGuildRepository::with(guild()));
        services
            .discord_port
            .expect_find_member_roles()
            .returning(|_, _| Ok(vec![RoleId(3)]));
        services
            .discord_port
            .expect_apply_role_diff()
            .times(1)
            .withf(|_, _, role_diff, _| {
                role_diff.to_assign.is_empty() && role_diff.to_remove == vec![RoleId(3)]
            })
            .returning(|_, _, _, _| Ok(()));
        services
            .discord_port
            .expect_reply()
            .returning(|_, _| Ok(MessageId(1)));

        command(services, "3").run().await.unwrap();
    }

    #[tokio::test]
    async fn other_roles_are_refused() {
        let mut services = TestServices::new();
        services.guild_repository = Arc::new(InMemoryGuildRepository::with(guild()));

        let result = command(services, "<@&9>").run().await;

        assert!(matches!(result, Err(CommandError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn busy_member_times_out() {
        let mut services = TestServices::new();
        services.guild_repository = Arc::new(InMemoryGuildRepository::with(guild()));
        let member_guard = services.member_guard.clone();
        let _held = member_guard
            .acquire(AUTHOR_ID, Duration::from_millis(50))
            .await
            .unwrap();

        let result = command(services, "<@&1>").run().await;

        assert!(matches!(
            result,
            Err(CommandError::Guard(GuardError::Timeout { .. }))
        ));
    }
}
