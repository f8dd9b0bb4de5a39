mod channel_id;
mod create_button;
mod create_embed;
mod create_message;
mod guild_id;
mod message_id;
mod role_id;
mod user_id;

use crate::discord::channel_id::domain_to_serenity_channel_id;
use crate::discord::create_message::{
    domain_to_serenity_create_message, domain_to_serenity_execute_webhook,
    domain_to_serenity_interaction_followup, domain_to_serenity_interaction_response,
};
use crate::discord::guild_id::domain_to_serenity_guild_id;
use crate::discord::message_id::{
    domain_to_serenity_interaction_id, domain_to_serenity_message_id,
    domain_to_serenity_webhook_id, serenity_to_domain_message_id,
};
use crate::discord::role_id::{domain_to_serenity_role_id, serenity_to_domain_role_id};
use crate::discord::user_id::domain_to_serenity_user_id;
use async_trait::async_trait;
use domain::ports::discord::{CreateMessage, DiscordError, DiscordPort, RoleDiff, Webhook};
use domain_shared::discord::{
    ChannelId, GuildId, InteractionId, MessageId, ReplyTarget, RoleId, UserId, WebhookId,
};
use poise::serenity_prelude as serenity;
use serenity::all::{Builder, Http};
use std::sync::Arc;
use tracing::{error, instrument, warn};

/// [`DiscordPort`] over the serenity HTTP client.
pub struct DiscordAdapter {
    client: Arc<Http>,
}

impl DiscordAdapter {
    #[instrument(level = "trace", skip_all)]
    pub fn new(client: Arc<Http>) -> Self {
        Self { client }
    }

    async fn reply_to_interaction(
        &self,
        interaction_id: InteractionId,
        token: &str,
        message: CreateMessage,
    ) -> Result<MessageId, serenity::Error> {
        let interaction_id = domain_to_serenity_interaction_id(interaction_id);
        let response =
            serenity::CreateInteractionResponse::Message(domain_to_serenity_interaction_response(message));

        response.execute(&self.client, (interaction_id, token)).await?;
        let message = self.client.get_original_interaction_response(token).await?;

        Ok(serenity_to_domain_message_id(message.id))
    }
}

fn map_serenity_err(err: serenity::Error) -> DiscordError {
    let status_code = match &err {
        serenity::Error::Http(http_error) => http_error.status_code().map(|code| code.as_u16()),
        _ => None,
    };

    match status_code {
        Some(403) => {
            warn!(error = ?err, "DiscordError::MissingAccess");
            DiscordError::MissingAccess
        }
        Some(404) => {
            warn!(error = ?err, "DiscordError::NotFound");
            DiscordError::NotFound
        }
        _ => {
            error!(error = ?err, "DiscordError::DiscordUnavailable");
            DiscordError::DiscordUnavailable
        }
    }
}

#[async_trait]
impl DiscordPort for DiscordAdapter {
    #[instrument(level = "debug", skip(self, message))]
    async fn send_message(
        &self,
        channel_id: ChannelId,
        message: CreateMessage,
    ) -> Result<MessageId, DiscordError> {
        let message = domain_to_serenity_create_message(message);
        let channel_id = domain_to_serenity_channel_id(channel_id);

        let message = message
            .execute(&self.client, (channel_id, None))
            .await
            .map_err(map_serenity_err)?;

        Ok(serenity_to_domain_message_id(message.id))
    }

    #[instrument(level = "debug", skip(self, target, message))]
    async fn reply(
        &self,
        target: &ReplyTarget,
        message: CreateMessage,
    ) -> Result<MessageId, DiscordError> {
        match target {
            ReplyTarget::Interaction {
                interaction_id,
                token,
            } => self
                .reply_to_interaction(*interaction_id, token, message)
                .await
                .map_err(map_serenity_err),
            ReplyTarget::Message {
                channel_id,
                message_id,
            } => {
                let channel_id = domain_to_serenity_channel_id(*channel_id);
                let message = domain_to_serenity_create_message(message)
                    .reference_message((channel_id, domain_to_serenity_message_id(*message_id)));

                let message = message
                    .execute(&self.client, (channel_id, None))
                    .await
                    .map_err(map_serenity_err)?;

                Ok(serenity_to_domain_message_id(message.id))
            }
        }
    }

    #[instrument(level = "debug", skip(self, target, message))]
    async fn follow_up(
        &self,
        target: &ReplyTarget,
        message: CreateMessage,
    ) -> Result<MessageId, DiscordError> {
        match target {
            ReplyTarget::Interaction { token, .. } => {
                let message = domain_to_serenity_interaction_followup(message)
                    .execute(&self.client, (None, token.as_str()))
                    .await
                    .map_err(map_serenity_err)?;

                Ok(serenity_to_domain_message_id(message.id))
            }
            ReplyTarget::Message { channel_id, .. } => self.send_message(*channel_id, message).await,
        }
    }

    #[instrument(level = "debug", skip(self, token, message))]
    async fn update_interaction_message(
        &self,
        interaction_id: InteractionId,
        token: &str,
        message: CreateMessage,
    ) -> Result<(), DiscordError> {
        let interaction_id = domain_to_serenity_interaction_id(interaction_id);
        let response = serenity::CreateInteractionResponse::UpdateMessage(
            domain_to_serenity_interaction_response(message),
        );

        response
            .execute(&self.client, (interaction_id, token))
            .await
            .map_err(map_serenity_err)
    }

    #[instrument(level = "debug", skip(self))]
    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        reason: &str,
    ) -> Result<(), DiscordError> {
        self.client
            .delete_message(
                domain_to_serenity_channel_id(channel_id),
                domain_to_serenity_message_id(message_id),
                Some(reason),
            )
            .await
            .map_err(map_serenity_err)
    }

    #[instrument(level = "debug", skip(self))]
    async fn find_member_roles(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Vec<RoleId>, DiscordError> {
        let member = self
            .client
            .get_member(
                domain_to_serenity_guild_id(guild_id),
                domain_to_serenity_user_id(user_id),
            )
            .await
            .map_err(map_serenity_err)?;

        Ok(member
            .roles
            .into_iter()
            .map(serenity_to_domain_role_id)
            .collect())
    }

    #[instrument(level = "debug", skip(self, role_diff))]
    async fn apply_role_diff(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        role_diff: &RoleDiff,
        reason: &str,
    ) -> Result<(), DiscordError> {
        let guild_id = domain_to_serenity_guild_id(guild_id);
        let user_id = domain_to_serenity_user_id(user_id);

        for role_id in &role_diff.to_remove {
            self.client
                .remove_member_role(guild_id, user_id, domain_to_serenity_role_id(*role_id), Some(reason))
                .await
                .map_err(map_serenity_err)?;
        }

        for role_id in &role_diff.to_assign {
            self.client
                .add_member_role(guild_id, user_id, domain_to_serenity_role_id(*role_id), Some(reason))
                .await
                .map_err(map_serenity_err)?;
        }

        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    async fn create_webhook(
        &self,
        channel_id: ChannelId,
        name: &str,
    ) -> Result<Webhook, DiscordError> {
        let webhook = serenity::CreateWebhook::new(name)
            .execute(&self.client, domain_to_serenity_channel_id(channel_id))
            .await
            .map_err(map_serenity_err)?;
        let url = webhook.url().map_err(map_serenity_err)?;

        Ok(Webhook {
            webhook_id: WebhookId(webhook.id.get()),
            url,
        })
    }

    #[instrument(level = "debug", skip(self))]
    async fn delete_webhook(&self, webhook_id: WebhookId) -> Result<(), DiscordError> {
        self.client
            .delete_webhook(domain_to_serenity_webhook_id(webhook_id), None)
            .await
            .map_err(map_serenity_err)
    }

    #[instrument(level = "debug", skip(self, url, message))]
    async fn execute_webhook(&self, url: &str, message: CreateMessage) -> Result<(), DiscordError> {
        let webhook = serenity::Webhook::from_url(&self.client, url)
            .await
            .map_err(map_serenity_err)?;

        webhook
            .execute(&self.client, false, domain_to_serenity_execute_webhook(message))
            .await
            .map_err(map_serenity_err)?;

        Ok(())
    }
}
