mod auto_response_cache;
mod pattern_cache;

pub use auto_response_cache::GuildAutoResponseCache;
pub use pattern_cache::GuildPatternCache;
