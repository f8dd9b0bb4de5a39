use crate::command::error::map_discord_err;
use crate::command::{Command, CommandError, GuildCommandContext};
use async_trait::async_trait;
use domain::argument::{resolve_role, resolve_string};
use domain::guild::AssignableRole;
use domain_shared::discord::RoleId;
use domain_shared::permission::{Permission, PermissionSet};
use tracing::{info, instrument};

fn permissions() -> PermissionSet {
    PermissionSet::from([Permission::ManageRoles])
}

/// Makes a role self-assignable. Members hold at most one role per group.
pub struct AssignableRoleAddCommand {
    context: GuildCommandContext,
    role_id: RoleId,
    group: String,
}

pub fn create_add(context: GuildCommandContext) -> Result<Box<dyn Command>, CommandError> {
    let parameters = context.parameters();
    let role_id = parameters.required("role", 0, resolve_role)?;
    let group = parameters.required("group", 1, resolve_string)?;

    Ok(Box::new(AssignableRoleAddCommand {
        context,
        role_id,
        group: group.trim().to_lowercase(),
    }))
}

#[async_trait]
impl Command for AssignableRoleAddCommand {
    fn permissions(&self) -> PermissionSet {
        permissions()
    }

    fn validate(&self) -> Result<(), CommandError> {
        if self.group.is_empty() {
            return Err(CommandError::InvalidArgument(
                "The group must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    #[instrument(level = "info", skip(self), fields(guild_id = self.context.guild_id.0, role_id = self.role_id.0))]
    async fn run(&self) -> Result<(), CommandError> {
        let mut guild = self.context.load_guild().await?;
        guild
            .assignable_roles
            .retain(|role| role.role_id != self.role_id);
        guild.assignable_roles.push(AssignableRole {
            role_id: self.role_id,
            group: self.group.clone(),
        });
        self.context.store_guild(&guild).await?;
        info!(group = %self.group, "Role made assignable");

        self.context
            .reply
            .info(format!(
                "{} can now be assigned from the group {}.",
                self.role_id.mention(),
                self.group
            ))
            .await
            .map_err(map_discord_err)?;
        Ok(())
    }
}

pub struct AssignableRoleRemoveCommand {
    context: GuildCommandContext,
    role_id: RoleId,
}

pub fn create_remove(context: GuildCommandContext) -> Result<Box<dyn Command>, CommandError> {
    let role_id = context.parameters().required("role", 0, resolve_role)?;

    Ok(Box::new(AssignableRoleRemoveCommand { context, role_id }))
}

#[async_trait]
impl Command for AssignableRoleRemoveCommand {
    fn permissions(&self) -> PermissionSet {
        permissions()
    }

    #[instrument(level = "info", skip(self), fields(guild_id = self.context.guild_id.0, role_id = self.role_id.0))]
    async fn run(&self) -> Result<(), CommandError> {
        let mut guild = self.context.load_guild().await?;
        if guild.assignable_role(self.role_id).is_none() {
            return Err(CommandError::InvalidArgument(format!(
                "{} is not self-assignable",
                self.role_id.mention()
            )));
        }

        guild
            .assignable_roles
            .retain(|role| role.role_id != self.role_id);
        self.context.store_guild(&guild).await?;
        info!("Role no longer assignable");

        self.context
            .reply
            .info(format!("{} can no longer be assigned.", self.role_id.mention()))
            .await
            .map_err(map_discord_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{guild_context, InMemoryGuildRepository, TestServices, GUILD_ID};
    use domain::guild::GuildEntity;
    use domain_shared::discord::MessageId;
    use std::sync::Arc;

    fn replying(services: &mut TestServices) {
        services
            .discord_port
            .expect_reply()
            .returning(|_, _| Ok(MessageId(1)));
    }

    #[tokio::test]
    async fn adding_again_moves_the_role_to_the_new_group() {
        let mut guild = GuildEntity::new(GUILD_ID);
        guild.assignable_roles = vec![AssignableRole {
            role_id: RoleId(1),
            group: "color".to_string(),
        }];
        let mut services = TestServices::new();
        services.guild_repository = Arc::new(InMemoryGuildRepository::with(guild));
        replying(&mut services);
        let guilds = services.guild_repository.clone();

        create_add(guild_context(services, "mod.assign.add", &["<@&1>", "Pings"]))
            .unwrap()
            .run()
            .await
            .unwrap();

        assert_eq!(
            guilds.stored(GUILD_ID).unwrap().assignable_roles,
            vec![AssignableRole {
                role_id: RoleId(1),
                group: "pings".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn removing_unknown_role_is_refused() {
        let services = TestServices::new();
        let guilds = services.guild_repository.clone();

        let result = create_remove(guild_context(services, "mod.assign.remove", &["<@&1>"]))
            .unwrap()
            .run()
            .await;

        assert!(matches!(result, Err(CommandError::InvalidArgument(_))));
        assert_eq!(guilds.puts(), 0);
    }
}
