use crate::command::{CommandError, ErrorKind};
use domain::ports::discord::{CreateEmbed, CreateMessage, DiscordError, DiscordPort};
use domain_shared::discord::{MessageId, ReplyTarget};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

pub const INFO_COLOR: u32 = 0x2ECC71;
pub const ERROR_COLOR: u32 = 0xE74C3C;
pub const WARNING_COLOR: u32 = 0xF1C40F;

/// Answers the event a command was invoked by.
///
/// The first message is sent as the reply, every further one as a follow-up.
pub struct ReplyChannel {
    discord_port: Arc<dyn DiscordPort + Send + Sync>,
    target: ReplyTarget,
    replied: AtomicBool,
}

impl ReplyChannel {
    pub fn new(discord_port: Arc<dyn DiscordPort + Send + Sync>, target: ReplyTarget) -> Self {
        Self {
            discord_port,
            target,
            replied: AtomicBool::new(false),
        }
    }

    #[instrument(level = "debug", skip(self, message))]
    pub async fn send(&self, message: CreateMessage) -> Result<MessageId, DiscordError> {
        if self.replied.swap(true, Ordering::AcqRel) {
            self.discord_port.follow_up(&self.target, message).await
        } else {
            self.discord_port.reply(&self.target, message).await
        }
    }

    pub async fn info(&self, description: impl Into<String>) -> Result<MessageId, DiscordError> {
        self.send(info_message(description)).await
    }
}

pub fn info_message(description: impl Into<String>) -> CreateMessage {
    CreateMessage::default().embed(
        CreateEmbed::default()
            .description(description)
            .color(INFO_COLOR),
    )
}

pub fn error_message(error: &CommandError) -> CreateMessage {
    let (title, color) = match error.kind() {
        ErrorKind::UserInput => ("Invalid input", WARNING_COLOR),
        ErrorKind::PermissionDenied => ("Permission denied", ERROR_COLOR),
        ErrorKind::ResourceContention => ("Please wait", WARNING_COLOR),
        ErrorKind::ConfigurationIntegrity => ("Configuration error", ERROR_COLOR),
        ErrorKind::TemporaryUnavailable => ("Temporarily unavailable", ERROR_COLOR),
        ErrorKind::Unhandled => ("Something went wrong", ERROR_COLOR),
    };

    CreateMessage::default()
        .embed(
            CreateEmbed::default()
                .title(title)
                .description(error.to_string())
                .color(color),
        )
        .ephemeral(true)
}

pub fn log_command_error(qualified_name: &str, error: &CommandError) {
    match error.kind() {
        ErrorKind::UserInput | ErrorKind::PermissionDenied | ErrorKind::ResourceContention => {
            info!(qualified_name, error = %error, "Command rejected");
        }
        ErrorKind::TemporaryUnavailable => {
            warn!(qualified_name, error = %error, "Command failed");
        }
        ErrorKind::ConfigurationIntegrity | ErrorKind::Unhandled => {
            error!(qualified_name, error = %error, "Command failed");
        }
    }
}

/// Logs and reports `error` to the author. A failure to report is only logged.
#[instrument(level = "debug", skip(reply, error))]
pub async fn report_command_error(qualified_name: &str, reply: &ReplyChannel, error: &CommandError) {
    log_command_error(qualified_name, error);

    if let Err(send_error) = reply.send(error_message(error)).await {
        error!(qualified_name, error = %send_error, "Failed to report command error");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::ports::discord::MockDiscordPort;
    use domain_shared::discord::{ChannelId, MessageId};

    fn target() -> ReplyTarget {
        ReplyTarget::Message {
            channel_id: ChannelId(1),
            message_id: MessageId(2),
        }
    }

    #[tokio::test]
    async fn first_message_replies_and_later_ones_follow_up() {
        let mut discord_port = MockDiscordPort::new();
        discord_port
            .expect_reply()
            .times(1)
            .returning(|_, _| Ok(MessageId(10)));
        discord_port
            .expect_follow_up()
            .times(2)
            .returning(|_, _| Ok(MessageId(11)));
        let reply = ReplyChannel::new(Arc::new(discord_port), target());

        assert_eq!(reply.info("one").await.unwrap(), MessageId(10));
        assert_eq!(reply.info("two").await.unwrap(), MessageId(11));
        assert_eq!(reply.info("three").await.unwrap(), MessageId(11));
    }

    #[test]
    fn error_messages_are_ephemeral_and_describe_the_error() {
        let message = error_message(&CommandError::InvalidArgument("Nope".to_string()));

        assert!(message.ephemeral);
        assert_eq!(message.embeds[0].title.as_deref(), Some("Invalid input"));
        assert_eq!(message.embeds[0].description.as_deref(), Some("Nope"));
    }
}
