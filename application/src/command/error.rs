use domain::argument::{ExpressionError, ResolutionError};
use domain::guard::GuardError;
use domain::guild::GuildRepositoryError;
use domain::permission::InsufficientPermission;
use domain::ports::discord::DiscordError;
use domain::rank::RankError;
use domain::user::UserRepositoryError;
use domain::webhook::WebhookRepositoryError;
use domain_shared::rank::Rank;
use thiserror::Error;
use tracing::{error, instrument, warn};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error("{0}")]
    InvalidArgument(String),
    #[error(transparent)]
    InsufficientPermission(#[from] InsufficientPermission),
    #[error("This command requires the rank {0}")]
    InsufficientRank(Rank),
    #[error("The bot is missing access to do this")]
    BotMissingAccess,
    #[error(transparent)]
    Guard(#[from] GuardError),
    #[error(transparent)]
    Rank(#[from] RankError),
    #[error("Service is temporarily unavailable")]
    TemporaryUnavailable,
    #[error("{0}")]
    Unhandled(String),
}

/// How an error is presented to the user and logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UserInput,
    PermissionDenied,
    ResourceContention,
    ConfigurationIntegrity,
    TemporaryUnavailable,
    Unhandled,
}

impl CommandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommandError::Resolution(_) | CommandError::InvalidArgument(_) => ErrorKind::UserInput,
            CommandError::InsufficientPermission(_)
            | CommandError::InsufficientRank(_)
            | CommandError::BotMissingAccess => ErrorKind::PermissionDenied,
            CommandError::Guard(_) => ErrorKind::ResourceContention,
            CommandError::Rank(_) => ErrorKind::ConfigurationIntegrity,
            CommandError::TemporaryUnavailable => ErrorKind::TemporaryUnavailable,
            CommandError::Unhandled(_) => ErrorKind::Unhandled,
        }
    }
}

impl From<ExpressionError> for CommandError {
    fn from(err: ExpressionError) -> Self {
        CommandError::InvalidArgument(err.to_string())
    }
}

#[instrument(level = "trace", skip_all)]
pub fn map_discord_err(err: DiscordError) -> CommandError {
    match err {
        DiscordError::DiscordUnavailable => {
            error!("DiscordError::DiscordUnavailable");
            CommandError::TemporaryUnavailable
        }
        DiscordError::MissingAccess => {
            warn!("DiscordError::MissingAccess");
            CommandError::BotMissingAccess
        }
        DiscordError::NotFound => CommandError::Unhandled("Discord resource not found".to_string()),
    }
}

#[instrument(level = "trace", skip_all)]
pub fn map_guild_repo_err(err: GuildRepositoryError) -> CommandError {
    match err {
        GuildRepositoryError::ServiceUnavailable => {
            error!("GuildRepositoryError::ServiceUnavailable");
            CommandError::TemporaryUnavailable
        }
    }
}

#[instrument(level = "trace", skip_all)]
pub fn map_user_repo_err(err: UserRepositoryError) -> CommandError {
    match err {
        UserRepositoryError::ServiceUnavailable => {
            error!("UserRepositoryError::ServiceUnavailable");
            CommandError::TemporaryUnavailable
        }
    }
}

#[instrument(level = "trace", skip_all)]
pub fn map_webhook_repo_err(err: WebhookRepositoryError) -> CommandError {
    match err {
        WebhookRepositoryError::ServiceUnavailable => {
            error!("WebhookRepositoryError::ServiceUnavailable");
            CommandError::TemporaryUnavailable
        }
    }
}
