mod options;

use crate::application_ports::Locator;
use crate::discord::permissions::serenity_to_domain_permissions;
use crate::discord::Error;
use crate::discord::commands::options::flatten_options;
use application_ports::command::{Author, CommandEvent};
use application_ports::message::MessageEvent;
use domain::argument::tokenize;
use domain_shared::discord::{ChannelId, GuildId, InteractionId, MessageId, ReplyTarget, UserId};
use domain_shared::permission::PermissionSet;
use poise::serenity_prelude as serenity;
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

fn serenity_to_domain_author(user: &serenity::User) -> Author {
    Author {
        user_id: UserId(user.id.get()),
        name: user.name.clone(),
        is_bot: user.bot,
    }
}

/// Splits `mod.blacklist.add` into name, group and subcommand.
fn split_qualified_name(qualified_name: &str) -> (String, Option<String>, Option<String>) {
    let mut parts = qualified_name.splitn(3, '.');
    let name = parts.next().unwrap_or_default().to_string();
    let first = parts.next().map(str::to_string);
    let second = parts.next().map(str::to_string);

    match second {
        Some(subcommand) => (name, first, Some(subcommand)),
        None => (name, None, first),
    }
}

/// Runs the message listeners and then dispatches the message if it is a text command.
#[instrument(level = "debug", skip_all, fields(message_id = message.id.get()))]
pub async fn handle_message<L: Locator>(
    ctx: &serenity::Context,
    message: &serenity::Message,
    locator: &L,
) -> Result<(), Error> {
    let author = serenity_to_domain_author(&message.author);
    let guild_id = message.guild_id.map(|guild_id| GuildId(guild_id.get()));
    let channel_id = ChannelId(message.channel_id.get());
    let message_id = MessageId(message.id.get());

    let event = MessageEvent {
        guild_id,
        channel_id,
        message_id,
        author: author.clone(),
        content: message.content.clone(),
    };
    match locator.get_message_listener_port().on_message(&event).await {
        Ok(true) => return Ok(()),
        Ok(false) => {}
        Err(err) => warn!("Message listener failed: {}", err),
    }

    let Some(command) = tokenize(&message.content, locator.command_prefix()) else {
        return Ok(());
    };
    let (name, subcommand_group, subcommand) = split_qualified_name(&command.qualified_name);

    let member_permissions = match message.author_permissions(ctx) {
        Some(permissions) => serenity_to_domain_permissions(permissions),
        None => PermissionSet::new(),
    };

    let event = CommandEvent {
        name,
        subcommand_group,
        subcommand,
        arguments: command.arguments,
        options: BTreeMap::new(),
        author,
        guild_id,
        channel_id,
        member_permissions,
        reply_target: ReplyTarget::Message {
            channel_id,
            message_id,
        },
    };

    let outcome = locator.get_command_dispatcher_port().dispatch(event).await;
    debug!(?outcome, "Text command dispatched");

    Ok(())
}

#[instrument(level = "debug", skip_all, fields(interaction_id = interaction.id.get()))]
pub async fn handle_slash_command<L: Locator>(
    interaction: &serenity::CommandInteraction,
    locator: &L,
) -> Result<(), Error> {
    let (subcommand_group, subcommand, options) = flatten_options(&interaction.data.options);

    let member_permissions = interaction
        .member
        .as_ref()
        .and_then(|member| member.permissions)
        .map(serenity_to_domain_permissions)
        .unwrap_or_default();

    let event = CommandEvent {
        name: interaction.data.name.clone(),
        subcommand_group,
        subcommand,
        arguments: Vec::new(),
        options,
        author: serenity_to_domain_author(&interaction.user),
        guild_id: interaction.guild_id.map(|guild_id| GuildId(guild_id.get())),
        channel_id: ChannelId(interaction.channel_id.get()),
        member_permissions,
        reply_target: ReplyTarget::Interaction {
            interaction_id: InteractionId(interaction.id.get()),
            token: interaction.token.clone(),
        },
    };

    let outcome = locator.get_command_dispatcher_port().dispatch(event).await;
    debug!(?outcome, "Slash command dispatched");

    Ok(())
}
