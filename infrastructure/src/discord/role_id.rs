use domain_shared::discord::RoleId;
use poise::serenity_prelude as serenity;

pub fn domain_to_serenity_role_id(role_id: RoleId) -> serenity::RoleId {
    serenity::RoleId::new(role_id.0)
}

pub fn serenity_to_domain_role_id(role_id: serenity::RoleId) -> RoleId {
    RoleId(role_id.get())
}
