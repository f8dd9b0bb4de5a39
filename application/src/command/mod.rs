pub mod context;
pub mod dev;
pub mod error;
pub mod guild;
pub mod moderation;
pub mod provider;
pub mod utility;

pub use context::{CommandContext, CommandServices, CommandSettings, GuildCommandContext, Parameters};
pub use error::{CommandError, ErrorKind};

use async_trait::async_trait;
use domain_shared::permission::PermissionSet;
use domain_shared::rank::Rank;

/// One invocation of a command with its parameters already resolved.
///
/// The dispatcher calls `post_construct`, checks `rank` and `permissions`, calls
/// `validate` and only then hands the command to the worker pool for `run`.
#[async_trait]
pub trait Command: Send + Sync {
    fn rank(&self) -> Rank {
        Rank::User
    }

    /// Channel permissions the author needs.
    fn permissions(&self) -> PermissionSet {
        PermissionSet::new()
    }

    fn post_construct(&mut self) {}

    fn validate(&self) -> Result<(), CommandError> {
        Ok(())
    }

    async fn run(&self) -> Result<(), CommandError>;
}
