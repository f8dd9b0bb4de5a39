use crate::command::error::map_discord_err;
use crate::command::{Command, CommandContext, CommandError};
use async_trait::async_trait;
use tracing::instrument;

pub struct SupportCommand {
    context: CommandContext,
}

pub fn create(context: CommandContext) -> Result<Box<dyn Command>, CommandError> {
    Ok(Box::new(SupportCommand { context }))
}

#[async_trait]
impl Command for SupportCommand {
    #[instrument(level = "info", skip(self))]
    async fn run(&self) -> Result<(), CommandError> {
        let description = match &self.context.services.settings.support_invite {
            Some(invite) => format!("Join the support server: {}", invite.0),
            None => "No support server is configured.".to_string(),
        };

        self.context
            .reply
            .info(description)
            .await
            .map_err(map_discord_err)?;
        Ok(())
    }
}
