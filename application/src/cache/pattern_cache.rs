use async_trait::async_trait;
use dashmap::DashMap;
use domain::cache::PatternCache;
use domain::guild::GuildRepository;
use domain_shared::discord::GuildId;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Blacklist patterns loaded lazily from the guild repository.
pub struct GuildPatternCache {
    guild_repository: Arc<dyn GuildRepository + Send + Sync>,
    patterns: DashMap<GuildId, Option<Regex>>,
}

impl GuildPatternCache {
    #[instrument(level = "trace", skip_all)]
    pub fn new(guild_repository: Arc<dyn GuildRepository + Send + Sync>) -> Self {
        Self {
            guild_repository,
            patterns: DashMap::new(),
        }
    }
}

#[async_trait]
impl PatternCache for GuildPatternCache {
    #[instrument(level = "trace", skip(self))]
    async fn get(&self, guild_id: GuildId) -> Option<Regex> {
        if let Some(pattern) = self.patterns.get(&guild_id) {
            return pattern.clone();
        }

        let guild = match self.guild_repository.get(guild_id).await {
            Ok(guild) => guild,
            Err(error) => {
                warn!(guild_id = guild_id.0, error = %error, "Could not load blacklist");
                return None;
            }
        };

        let pattern = guild.and_then(|guild| match guild.blacklist_pattern() {
            Ok(pattern) => pattern,
            Err(error) => {
                warn!(guild_id = guild_id.0, error = %error, "Stored blacklist does not compile");
                None
            }
        });

        debug!(guild_id = guild_id.0, "Blacklist loaded");
        self.patterns.insert(guild_id, pattern.clone());
        pattern
    }

    #[instrument(level = "debug", skip(self))]
    fn invalidate(&self, guild_id: GuildId) {
        self.patterns.remove(&guild_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::guild::{GuildEntity, GuildRepositoryError, MockGuildRepository};

    fn repository(times: usize) -> MockGuildRepository {
        let mut repository = MockGuildRepository::new();
        repository
            .expect_get()
            .times(times)
            .returning(|guild_id| {
                let mut guild = GuildEntity::new(guild_id);
                guild.blacklist = vec!["foo".to_string(), "bar".to_string()];
                Ok(Some(guild))
            });
        repository
    }

    #[tokio::test]
    async fn loads_once_until_invalidated() {
        let cache = GuildPatternCache::new(Arc::new(repository(2)));

        assert!(cache.get(GuildId(1)).await.unwrap().is_match("a bar"));
        assert!(cache.get(GuildId(1)).await.is_some());
        cache.invalidate(GuildId(1));
        assert!(cache.get(GuildId(1)).await.is_some());
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let mut repository = MockGuildRepository::new();
        repository
            .expect_get()
            .times(2)
            .returning(|_| Err(GuildRepositoryError::ServiceUnavailable));
        let cache = GuildPatternCache::new(Arc::new(repository));

        assert!(cache.get(GuildId(1)).await.is_none());
        assert!(cache.get(GuildId(1)).await.is_none());
    }
}
