use crate::command::error::map_discord_err;
use crate::command::{Command, CommandContext, CommandError};
use async_trait::async_trait;
use domain_shared::rank::Rank;
use tracing::{info, instrument};

pub struct KillCommand {
    context: CommandContext,
}

pub fn create(context: CommandContext) -> Result<Box<dyn Command>, CommandError> {
    Ok(Box::new(KillCommand { context }))
}

#[async_trait]
impl Command for KillCommand {
    fn rank(&self) -> Rank {
        Rank::Developer
    }

    #[instrument(level = "info", skip(self))]
    async fn run(&self) -> Result<(), CommandError> {
        info!(
            user_id = self.context.event.author.user_id.0,
            "Shutdown requested"
        );

        self.context
            .reply
            .info("Shutting down.")
            .await
            .map_err(map_discord_err)?;
        self.context.services.lifecycle_port.shutdown();
        Ok(())
    }
}
