use domain_shared::discord::GuildId;
use poise::serenity_prelude as serenity;

pub fn domain_to_serenity_guild_id(guild_id: GuildId) -> serenity::GuildId {
    serenity::GuildId::new(guild_id.0)
}
