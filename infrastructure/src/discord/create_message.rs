use crate::discord::create_button::domain_to_serenity_create_action_row;
use crate::discord::create_embed::domain_to_serenity_create_embed;
use domain::ports::discord::CreateMessage;
use poise::serenity_prelude as serenity;

struct Parts {
    content: Option<String>,
    embeds: Vec<serenity::CreateEmbed>,
    components: Vec<serenity::CreateActionRow>,
    ephemeral: bool,
}

fn into_parts(message: CreateMessage) -> Parts {
    let CreateMessage {
        content,
        embeds,
        action_rows,
        ephemeral,
    } = message;

    Parts {
        content,
        embeds: embeds
            .into_iter()
            .map(domain_to_serenity_create_embed)
            .collect(),
        components: action_rows
            .into_iter()
            .map(domain_to_serenity_create_action_row)
            .collect(),
        ephemeral,
    }
}

pub fn domain_to_serenity_create_message(message: CreateMessage) -> serenity::CreateMessage {
    let Parts {
        content,
        embeds,
        components,
        ephemeral: _,
    } = into_parts(message);

    let mut message = serenity::CreateMessage::new()
        .embeds(embeds)
        .components(components);

    if let Some(content) = content {
        message = message.content(content);
    }

    message
}

pub fn domain_to_serenity_interaction_response(
    message: CreateMessage,
) -> serenity::CreateInteractionResponseMessage {
    let Parts {
        content,
        embeds,
        components,
        ephemeral,
    } = into_parts(message);

    let mut message = serenity::CreateInteractionResponseMessage::new()
        .embeds(embeds)
        .components(components)
        .ephemeral(ephemeral);

    if let Some(content) = content {
        message = message.content(content);
    }

    message
}

pub fn domain_to_serenity_interaction_followup(
    message: CreateMessage,
) -> serenity::CreateInteractionResponseFollowup {
    let Parts {
        content,
        embeds,
        components,
        ephemeral,
    } = into_parts(message);

    let mut message = serenity::CreateInteractionResponseFollowup::new()
        .embeds(embeds)
        .components(components)
        .ephemeral(ephemeral);

    if let Some(content) = content {
        message = message.content(content);
    }

    message
}

pub fn domain_to_serenity_execute_webhook(message: CreateMessage) -> serenity::ExecuteWebhook {
    let Parts {
        content,
        embeds,
        components: _,
        ephemeral: _,
    } = into_parts(message);

    let mut message = serenity::ExecuteWebhook::new().embeds(embeds);

    if let Some(content) = content {
        message = message.content(content);
    }

    message
}
