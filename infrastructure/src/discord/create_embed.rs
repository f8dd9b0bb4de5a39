use domain::ports::discord::{CreateEmbed, EmbedField};
use poise::serenity_prelude as serenity;

pub fn domain_to_serenity_create_embed(embed: CreateEmbed) -> serenity::CreateEmbed {
    let CreateEmbed {
        title,
        description,
        url,
        color,
        author,
        image,
        footer,
        timestamp,
        fields,
    } = embed;

    let mut embed = serenity::CreateEmbed::new();

    if let Some(title) = title {
        embed = embed.title(title);
    }
    if let Some(description) = description {
        embed = embed.description(description);
    }
    if let Some(url) = url {
        embed = embed.url(url);
    }
    if let Some(color) = color {
        embed = embed.color(color);
    }
    if let Some(author) = author {
        embed = embed.author(serenity::CreateEmbedAuthor::new(author));
    }
    if let Some(image) = image {
        embed = embed.image(image);
    }
    if let Some(footer) = footer {
        embed = embed.footer(serenity::CreateEmbedFooter::new(footer));
    }
    if let Some(timestamp) = timestamp {
        embed = embed.timestamp(timestamp);
    }

    embed.fields(
        fields
            .into_iter()
            .map(|EmbedField { name, value, inline }| (name, value, inline)),
    )
}
