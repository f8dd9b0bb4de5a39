use async_trait::async_trait;
use domain_shared::discord::GuildId;
use regex::Regex;

#[derive(Debug, Clone)]
pub struct CompiledAutoResponse {
    pub pattern: Regex,
    pub answer: String,
}

/// Compiled blacklist per guild.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait PatternCache {
    async fn get(&self, guild_id: GuildId) -> Option<Regex>;
    fn invalidate(&self, guild_id: GuildId);
}

/// Compiled auto-responses per guild, in configuration order.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait AutoResponseCache {
    async fn get(&self, guild_id: GuildId) -> Vec<CompiledAutoResponse>;
    fn invalidate(&self, guild_id: GuildId);
}
