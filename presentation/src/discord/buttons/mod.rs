use crate::application_ports::Locator;
use crate::discord::Error;
use application_ports::site::{ButtonClickEvent, SiteError};
use domain_shared::discord::{InteractionId, MessageId, UserId};
use poise::serenity_prelude as serenity;
use tracing::{instrument, warn};

#[instrument(level = "info", skip_all, fields(button_id = interaction.data.custom_id, user_id = interaction.user.id.get()))]
pub async fn handle_button_click<L: Locator>(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
    locator: &L,
) -> Result<(), Error> {
    let site_port = locator.get_site_port();
    if !site_port.handles(&interaction.data.custom_id) {
        warn!("Click on a button nobody handles");
        return Ok(());
    }

    let event = ButtonClickEvent {
        interaction_id: InteractionId(interaction.id.get()),
        token: interaction.token.clone(),
        message_id: MessageId(interaction.message.id.get()),
        user_id: UserId(interaction.user.id.get()),
        button_id: interaction.data.custom_id.clone(),
    };

    match site_port.on_button_click(event).await {
        Ok(()) => Ok(()),
        Err(err @ (SiteError::SiteNotFound | SiteError::NotOwner | SiteError::UnknownButton)) => {
            respond_ephemeral(ctx, interaction, err.to_string()).await
        }
        Err(SiteError::TemporaryUnavailable) => {
            respond_ephemeral(
                ctx,
                interaction,
                "The service is temporarily unavailable. Please try again later.",
            )
            .await
        }
    }
}

async fn respond_ephemeral(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
    content: impl Into<String>,
) -> Result<(), Error> {
    let response = serenity::CreateInteractionResponse::Message(
        serenity::CreateInteractionResponseMessage::new()
            .content(content)
            .ephemeral(true),
    );
    interaction.create_response(ctx, response).await?;

    Ok(())
}
