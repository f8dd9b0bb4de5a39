use async_trait::async_trait;
use dashmap::DashMap;
use domain::cache::{AutoResponseCache, CompiledAutoResponse};
use domain::guild::GuildRepository;
use domain_shared::discord::GuildId;
use regex::Regex;
use std::sync::Arc;
use tracing::{instrument, warn};

/// Auto-responses loaded lazily from the guild repository.
///
/// Responses whose pattern does not compile are skipped.
pub struct GuildAutoResponseCache {
    guild_repository: Arc<dyn GuildRepository + Send + Sync>,
    responses: DashMap<GuildId, Vec<CompiledAutoResponse>>,
}

impl GuildAutoResponseCache {
    #[instrument(level = "trace", skip_all)]
    pub fn new(guild_repository: Arc<dyn GuildRepository + Send + Sync>) -> Self {
        Self {
            guild_repository,
            responses: DashMap::new(),
        }
    }
}

#[async_trait]
impl AutoResponseCache for GuildAutoResponseCache {
    #[instrument(level = "trace", skip(self))]
    async fn get(&self, guild_id: GuildId) -> Vec<CompiledAutoResponse> {
        if let Some(responses) = self.responses.get(&guild_id) {
            return responses.clone();
        }

        let guild = match self.guild_repository.get(guild_id).await {
            Ok(guild) => guild,
            Err(error) => {
                warn!(guild_id = guild_id.0, error = %error, "Could not load auto-responses");
                return Vec::new();
            }
        };

        let responses: Vec<_> = guild
            .map(|guild| guild.auto_responses)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|response| match Regex::new(&response.pattern) {
                Ok(pattern) => Some(CompiledAutoResponse {
                    pattern,
                    answer: response.answer,
                }),
                Err(error) => {
                    warn!(guild_id = guild_id.0, error = %error, "Skipping auto-response");
                    None
                }
            })
            .collect();

        self.responses.insert(guild_id, responses.clone());
        responses
    }

    #[instrument(level = "debug", skip(self))]
    fn invalidate(&self, guild_id: GuildId) {
        self.responses.remove(&guild_id);
    }
}
