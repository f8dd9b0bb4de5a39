use crate::command::error::map_discord_err;
use crate::command::CommandError;
use crate::reply::ReplyChannel;
use application_ports::site::{ButtonClickEvent, SiteError, SitePort};
use async_trait::async_trait;
use dashmap::DashMap;
use domain::ports::discord::{DiscordError, DiscordPort};
use domain::site::{Site, SITE_LEFT_BUTTON_ID, SITE_RIGHT_BUTTON_ID};
use domain_shared::discord::MessageId;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, instrument};

struct SiteEntry {
    site: Site,
    created_at: Instant,
}

/// Open sites keyed by the message showing them.
pub struct SiteCache {
    discord_port: Arc<dyn DiscordPort + Send + Sync>,
    sites: DashMap<MessageId, SiteEntry>,
}

impl SiteCache {
    #[instrument(level = "trace", skip_all)]
    pub fn new(discord_port: Arc<dyn DiscordPort + Send + Sync>) -> Self {
        Self {
            discord_port,
            sites: DashMap::new(),
        }
    }

    /// Sends the first page as a reply and keeps the site if it can be paged.
    #[instrument(level = "debug", skip_all, fields(pages = site.len()))]
    pub async fn open(&self, reply: &ReplyChannel, site: Site) -> Result<(), CommandError> {
        let message_id = reply.send(site.message()).await.map_err(map_discord_err)?;

        if site.len() > 1 {
            self.sites.insert(
                message_id,
                SiteEntry {
                    site,
                    created_at: Instant::now(),
                },
            );
        }

        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    pub fn evict_older_than(&self, max_age: Duration) -> usize {
        let before = self.sites.len();
        self.sites
            .retain(|_, entry| entry.created_at.elapsed() < max_age);
        before.saturating_sub(self.sites.len())
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

#[async_trait]
impl SitePort for SiteCache {
    fn handles(&self, button_id: &str) -> bool {
        button_id == SITE_LEFT_BUTTON_ID || button_id == SITE_RIGHT_BUTTON_ID
    }

    #[instrument(level = "info", skip(self))]
    async fn on_button_click(&self, event: ButtonClickEvent) -> Result<(), SiteError> {
        let message = {
            let mut entry = self
                .sites
                .get_mut(&event.message_id)
                .ok_or(SiteError::SiteNotFound)?;

            if entry.site.owner() != event.user_id {
                return Err(SiteError::NotOwner);
            }

            match event.button_id.as_str() {
                SITE_LEFT_BUTTON_ID => entry.site.move_left(),
                SITE_RIGHT_BUTTON_ID => entry.site.move_right(),
                _ => return Err(SiteError::UnknownButton),
            };
            entry.site.message()
        };

        debug!("Turning page");
        self.discord_port
            .update_interaction_message(event.interaction_id, &event.token, message)
            .await
            .map_err(map_site_discord_err)
    }
}

#[instrument(level = "trace", skip_all)]
fn map_site_discord_err(err: DiscordError) -> SiteError {
    error!(error = %err, "Failed to turn page");
    SiteError::TemporaryUnavailable
}
