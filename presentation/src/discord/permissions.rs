use domain_shared::permission::{Permission, PermissionSet};
use poise::serenity_prelude as serenity;

fn permission_flag(permission: Permission) -> serenity::Permissions {
    match permission {
        Permission::Administrator => serenity::Permissions::ADMINISTRATOR,
        Permission::ManageGuild => serenity::Permissions::MANAGE_GUILD,
        Permission::ManageChannels => serenity::Permissions::MANAGE_CHANNELS,
        Permission::ManageRoles => serenity::Permissions::MANAGE_ROLES,
        Permission::ManageMessages => serenity::Permissions::MANAGE_MESSAGES,
        Permission::ManageWebhooks => serenity::Permissions::MANAGE_WEBHOOKS,
        Permission::KickMembers => serenity::Permissions::KICK_MEMBERS,
        Permission::BanMembers => serenity::Permissions::BAN_MEMBERS,
        Permission::ViewChannel => serenity::Permissions::VIEW_CHANNEL,
        Permission::SendMessages => serenity::Permissions::SEND_MESSAGES,
    }
}

pub fn serenity_to_domain_permissions(permissions: serenity::Permissions) -> PermissionSet {
    Permission::ALL
        .into_iter()
        .filter(|permission| permissions.contains(permission_flag(*permission)))
        .collect()
}
