use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Channel permissions the bot checks before running a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Permission {
    Administrator,
    ManageGuild,
    ManageChannels,
    ManageRoles,
    ManageMessages,
    ManageWebhooks,
    KickMembers,
    BanMembers,
    ViewChannel,
    SendMessages,
}

pub type PermissionSet = BTreeSet<Permission>;

impl Permission {
    pub const ALL: [Permission; 10] = [
        Permission::Administrator,
        Permission::ManageGuild,
        Permission::ManageChannels,
        Permission::ManageRoles,
        Permission::ManageMessages,
        Permission::ManageWebhooks,
        Permission::KickMembers,
        Permission::BanMembers,
        Permission::ViewChannel,
        Permission::SendMessages,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Permission::Administrator => "ADMINISTRATOR",
            Permission::ManageGuild => "MANAGE_GUILD",
            Permission::ManageChannels => "MANAGE_CHANNELS",
            Permission::ManageRoles => "MANAGE_ROLES",
            Permission::ManageMessages => "MANAGE_MESSAGES",
            Permission::ManageWebhooks => "MANAGE_WEBHOOKS",
            Permission::KickMembers => "KICK_MEMBERS",
            Permission::BanMembers => "BAN_MEMBERS",
            Permission::ViewChannel => "VIEW_CHANNEL",
            Permission::SendMessages => "SEND_MESSAGES",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
