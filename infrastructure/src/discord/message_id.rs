use domain_shared::discord::{InteractionId, MessageId, WebhookId};
use poise::serenity_prelude as serenity;

pub fn domain_to_serenity_message_id(message_id: MessageId) -> serenity::MessageId {
    serenity::MessageId::new(message_id.0)
}

pub fn serenity_to_domain_message_id(message_id: serenity::MessageId) -> MessageId {
    MessageId(message_id.get())
}

pub fn domain_to_serenity_interaction_id(interaction_id: InteractionId) -> serenity::InteractionId {
    serenity::InteractionId::new(interaction_id.0)
}

pub fn domain_to_serenity_webhook_id(webhook_id: WebhookId) -> serenity::WebhookId {
    serenity::WebhookId::new(webhook_id.0)
}
