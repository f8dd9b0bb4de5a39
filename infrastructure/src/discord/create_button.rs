use domain::ports::discord::{ButtonKind, CreateActionRow, CreateButton};
use poise::serenity_prelude as serenity;

pub fn domain_to_serenity_create_button(button: CreateButton) -> serenity::CreateButton {
    let CreateButton { label, data } = button;

    match data {
        ButtonKind::Link { url } => serenity::CreateButton::new_link(url),
        ButtonKind::NonLink { button_id } => {
            serenity::CreateButton::new(button_id.0).style(serenity::ButtonStyle::Secondary)
        }
    }
    .label(label)
}

pub fn domain_to_serenity_create_action_row(action_row: CreateActionRow) -> serenity::CreateActionRow {
    match action_row {
        CreateActionRow::Buttons { components } => serenity::CreateActionRow::Buttons(
            components
                .into_iter()
                .map(domain_to_serenity_create_button)
                .collect(),
        ),
    }
}
