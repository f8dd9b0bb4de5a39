use crate::application_ports::Locator;
use poise::serenity_prelude as serenity;
use poise::serenity_prelude::{ClientBuilder, ComponentInteractionDataKind, Interaction};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{info, instrument};

mod buttons;
mod commands;
mod permissions;

pub type Error = Box<dyn std::error::Error + Send + Sync>;

const COMMANDS: &str = include_str!("../../resources/commands.json");

/// Connects to the gateway and serves events until `shutdown` is notified.
///
/// `on_shard_manager` receives the shard manager before the shards connect.
#[instrument(level = "info", skip_all)]
pub async fn run_bot<L, F>(
    locator: L,
    token: String,
    shutdown: Arc<Notify>,
    on_shard_manager: F,
) -> Result<(), Error>
where
    L: Locator + Send + Sync + 'static,
    F: FnOnce(Arc<serenity::ShardManager>),
{
    let intents = serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::MESSAGE_CONTENT;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            event_handler: |ctx, event, framework, locator| {
                Box::pin(event_handler(ctx, event, framework, locator))
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, _framework| {
            Box::pin(async move {
                register_commands(&ctx.http).await?;
                info!(user = %ready.user.name, "Bot is ready");
                Ok(locator)
            })
        })
        .build();

    let mut client = ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    on_shard_manager(client.shard_manager.clone());

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        shutdown.notified().await;
        info!("Shutting down shards");
        shard_manager.shutdown_all().await;
    });

    client.start().await?;

    Ok(())
}

async fn register_commands(http: &serenity::Http) -> Result<(), Error> {
    let commands: serde_json::Value = serde_json::from_str(COMMANDS)?;
    let registered = http.create_global_commands(&commands).await?;
    info!(count = registered.len(), "Slash commands registered");

    Ok(())
}

async fn event_handler<L: Locator>(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, L, Error>,
    locator: &L,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Message { new_message } => {
            commands::handle_message(ctx, new_message, locator).await?
        }
        serenity::FullEvent::InteractionCreate {
            interaction: Interaction::Command(command_interaction),
        } => commands::handle_slash_command(command_interaction, locator).await?,
        serenity::FullEvent::InteractionCreate {
            interaction: Interaction::Component(component_interaction),
        } => {
            if let ComponentInteractionDataKind::Button = component_interaction.data.kind {
                buttons::handle_button_click(ctx, component_interaction, locator).await?
            }
        }
        _ => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_metadata_is_valid_json() {
        let commands: serde_json::Value = serde_json::from_str(COMMANDS).unwrap();
        let names: Vec<_> = commands
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|command| command["name"].as_str())
            .collect();

        assert_eq!(names, vec!["assign", "dev", "math", "mod", "support"]);
    }
}
