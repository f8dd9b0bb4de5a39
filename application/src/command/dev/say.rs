use crate::command::error::map_discord_err;
use crate::command::{Command, CommandContext, CommandError};
use async_trait::async_trait;
use domain::argument::resolve_string;
use domain::ports::discord::CreateMessage;
use domain_shared::rank::Rank;
use tracing::instrument;

pub struct SayCommand {
    context: CommandContext,
    content: String,
}

pub fn create(context: CommandContext) -> Result<Box<dyn Command>, CommandError> {
    let content = context
        .parameters()
        .remaining("content", 0, resolve_string)?
        .join(" ");

    Ok(Box::new(SayCommand { context, content }))
}

#[async_trait]
impl Command for SayCommand {
    fn rank(&self) -> Rank {
        Rank::Developer
    }

    fn validate(&self) -> Result<(), CommandError> {
        if self.content.trim().is_empty() {
            return Err(CommandError::InvalidArgument("Nothing to say".to_string()));
        }
        Ok(())
    }

    #[instrument(level = "info", skip(self))]
    async fn run(&self) -> Result<(), CommandError> {
        self.context
            .reply
            .send(CreateMessage::default().content(self.content.clone()))
            .await
            .map_err(map_discord_err)?;
        Ok(())
    }
}
