use crate::command::error::map_discord_err;
use crate::command::{Command, CommandContext, CommandError};
use crate::reply::INFO_COLOR;
use async_trait::async_trait;
use chrono::Utc;
use domain::argument::{resolve_time_unit, NamedVariant, TimeUnit};
use domain::ports::discord::{CreateEmbed, CreateMessage};
use domain_shared::rank::Rank;
use tracing::instrument;

/// Uptime and the size of the in-memory state.
pub struct StatusCommand {
    context: CommandContext,
    unit: TimeUnit,
}

pub fn create(context: CommandContext) -> Result<Box<dyn Command>, CommandError> {
    let unit = context
        .parameters()
        .optional("unit", 0, resolve_time_unit)?
        .unwrap_or(TimeUnit::Hours);

    Ok(Box::new(StatusCommand { context, unit }))
}

#[async_trait]
impl Command for StatusCommand {
    fn rank(&self) -> Rank {
        Rank::Developer
    }

    #[instrument(level = "info", skip(self))]
    async fn run(&self) -> Result<(), CommandError> {
        let services = &self.context.services;
        let uptime = Utc::now() - services.settings.started_at;

        let embed = CreateEmbed::default()
            .title("Status")
            .color(INFO_COLOR)
            .field(
                "Uptime",
                format!(
                    "{} {}",
                    self.unit.count(uptime),
                    self.unit.name().to_lowercase()
                ),
                true,
            )
            .field(
                "Workers",
                services.settings.worker_threads.to_string(),
                true,
            )
            .field("Guarded members", services.member_guard.len().to_string(), true)
            .field("Open sites", services.site_cache.len().to_string(), true);

        self.context
            .reply
            .send(CreateMessage::default().embed(embed))
            .await
            .map_err(map_discord_err)?;
        Ok(())
    }
}
