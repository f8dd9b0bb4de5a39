use crate::command::error::{map_discord_err, map_user_repo_err};
use crate::command::{Command, CommandContext, CommandError};
use async_trait::async_trait;
use domain::argument::{resolve_rank, resolve_user};
use domain::user::UserEntity;
use domain_shared::discord::UserId;
use domain_shared::rank::Rank;
use tracing::{info, instrument};

/// Grants a rank to a user, or revokes it if the user already has it.
pub struct RankCommand {
    context: CommandContext,
    user_id: UserId,
    rank: Rank,
}

pub fn create(context: CommandContext) -> Result<Box<dyn Command>, CommandError> {
    let parameters = context.parameters();
    let user_id = parameters.required("user", 0, resolve_user)?;
    let rank = parameters.required("rank", 1, resolve_rank)?;

    Ok(Box::new(RankCommand {
        context,
        user_id,
        rank,
    }))
}

#[async_trait]
impl Command for RankCommand {
    fn rank(&self) -> Rank {
        Rank::Developer
    }

    fn validate(&self) -> Result<(), CommandError> {
        if self.rank == Rank::Root {
            return Err(CommandError::InvalidArgument(
                "ROOT can only be obtained through the failsafe".to_string(),
            ));
        }
        Ok(())
    }

    #[instrument(level = "info", skip(self), fields(user_id = self.user_id.0, rank = %self.rank))]
    async fn run(&self) -> Result<(), CommandError> {
        let user_repository = &self.context.services.user_repository;

        let mut user = user_repository
            .get(self.user_id)
            .await
            .map_err(map_user_repo_err)?
            .unwrap_or_else(|| UserEntity::new(self.user_id));

        let granted = if user.has_rank(self.rank) {
            user.revoke(self.rank);
            false
        } else {
            user.grant(self.rank);
            true
        };

        user_repository
            .put(&user)
            .await
            .map_err(map_user_repo_err)?;
        info!(granted, "Rank changed");

        let description = if granted {
            format!("Granted {} to {}.", self.rank, self.user_id.mention())
        } else {
            format!("Revoked {} from {}.", self.rank, self.user_id.mention())
        };
        self.context
            .reply
            .info(description)
            .await
            .map_err(map_discord_err)?;
        Ok(())
    }
}
