use application_ports::message::{MessageEvent, MessageListenerError, MessageListenerPort};
use async_trait::async_trait;
use domain::cache::{AutoResponseCache, PatternCache};
use domain::ports::discord::{CreateMessage, DiscordError, DiscordPort};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Deletes blacklisted messages and answers auto-responses.
pub struct MessageListener {
    discord_port: Arc<dyn DiscordPort + Send + Sync>,
    pattern_cache: Arc<dyn PatternCache + Send + Sync>,
    auto_response_cache: Arc<dyn AutoResponseCache + Send + Sync>,
}

impl MessageListener {
    #[instrument(level = "trace", skip_all)]
    pub fn new(
        discord_port: Arc<dyn DiscordPort + Send + Sync>,
        pattern_cache: Arc<dyn PatternCache + Send + Sync>,
        auto_response_cache: Arc<dyn AutoResponseCache + Send + Sync>,
    ) -> Self {
        Self {
            discord_port,
            pattern_cache,
            auto_response_cache,
        }
    }
}

#[async_trait]
impl MessageListenerPort for MessageListener {
    #[instrument(level = "debug", skip_all, fields(message_id = event.message_id.0))]
    async fn on_message(&self, event: &MessageEvent) -> Result<bool, MessageListenerError> {
        if event.author.is_bot {
            return Ok(false);
        }
        let Some(guild_id) = event.guild_id else {
            return Ok(false);
        };

        if let Some(pattern) = self.pattern_cache.get(guild_id).await {
            if pattern.is_match(&event.content) {
                self.discord_port
                    .delete_message(event.channel_id, event.message_id, "Blacklisted content")
                    .await
                    .map_err(map_discord_err)?;
                info!(
                    guild_id = guild_id.0,
                    user_id = event.author.user_id.0,
                    "Deleted blacklisted message"
                );
                return Ok(true);
            }
        }

        let responses = self.auto_response_cache.get(guild_id).await;
        if let Some(response) = responses
            .iter()
            .find(|response| response.pattern.is_match(&event.content))
        {
            self.discord_port
                .send_message(
                    event.channel_id,
                    CreateMessage::default().content(response.answer.clone()),
                )
                .await
                .map_err(map_discord_err)?;
        }

        Ok(false)
    }
}

#[instrument(level = "trace", skip_all)]
fn map_discord_err(err: DiscordError) -> MessageListenerError {
    error!(error = %err, "Message listener could not reach Discord");
    MessageListenerError::TemporaryUnavailable
}
