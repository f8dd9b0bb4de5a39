use crate::command::error::{map_discord_err, map_user_repo_err};
use crate::command::{Command, CommandContext, CommandError};
use async_trait::async_trait;
use domain::user::UserEntity;
use domain_shared::rank::Rank;
use rand::seq::SliceRandom;
use tracing::{info, instrument};

const ROOT_QUOTES: &[&str] = &[
    "Root access granted. Welcome back, {user}.",
    "{user} now holds the keys to everything.",
    "Safety off, {user}. Try not to break anything.",
];

const DEVELOPER_QUOTES: &[&str] = &[
    "{user} is back to being a developer.",
    "Root access revoked for {user}.",
    "Safety on, {user}.",
];

/// Switches the author between DEVELOPER and ROOT.
pub struct FailsafeCommand {
    context: CommandContext,
}

pub fn create(context: CommandContext) -> Result<Box<dyn Command>, CommandError> {
    Ok(Box::new(FailsafeCommand { context }))
}

#[async_trait]
impl Command for FailsafeCommand {
    fn rank(&self) -> Rank {
        Rank::Developer
    }

    #[instrument(level = "info", skip(self))]
    async fn run(&self) -> Result<(), CommandError> {
        let author = &self.context.event.author;
        let user_repository = &self.context.services.user_repository;

        let mut user = user_repository
            .get(author.user_id)
            .await
            .map_err(map_user_repo_err)?
            .unwrap_or_else(|| UserEntity::new(author.user_id));
        user.name = Some(author.name.clone());

        let became_root = if user.has_rank(Rank::Root) {
            user.revoke(Rank::Root);
            user.grant(Rank::Developer);
            false
        } else {
            user.revoke(Rank::Developer);
            user.grant(Rank::Root);
            true
        };

        user_repository
            .put(&user)
            .await
            .map_err(map_user_repo_err)?;
        info!(user_id = author.user_id.0, became_root, "Failsafe toggled");

        let quote = {
            let quotes = if became_root {
                ROOT_QUOTES
            } else {
                DEVELOPER_QUOTES
            };
            quotes
                .choose(&mut rand::thread_rng())
                .copied()
                .unwrap_or("{user}")
        };

        self.context
            .reply
            .info(quote.replace("{user}", &author.user_id.mention()))
            .await
            .map_err(map_discord_err)?;
        Ok(())
    }
}
