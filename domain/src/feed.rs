use crate::ports::discord::{CreateEmbed, CreateMessage, DiscordError};
use crate::ports::reddit::Link;
use async_trait::async_trait;

const REDDIT_COLOR: u32 = 0xFF4500;

/// Receives every new link of the subreddits it is registered for.
#[async_trait]
pub trait SubredditListener {
    async fn on_link(&self, link: &Link) -> Result<(), DiscordError>;
}

pub fn link_message(link: &Link) -> CreateMessage {
    let mut embed = CreateEmbed::default()
        .title(truncate(&link.title, 256))
        .url(link.permalink_url())
        .author(format!("u/{}", link.author))
        .footer(format!("r/{}", link.subreddit))
        .timestamp(link.created_at)
        .color(REDDIT_COLOR);

    if !link.nsfw {
        if let Some(image) = link.url.as_deref().filter(|url| is_image(url)) {
            embed = embed.image(image);
        }
    }

    CreateMessage::default().embed(embed)
}

fn is_image(url: &str) -> bool {
    [".png", ".jpg", ".jpeg", ".gif", ".webp"]
        .iter()
        .any(|extension| url.ends_with(extension))
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
