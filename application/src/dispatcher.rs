use crate::command::error::map_user_repo_err;
use crate::command::provider::CommandProvider;
use crate::command::{Command, CommandContext, CommandError, CommandServices};
use crate::reply::{report_command_error, ReplyChannel};
use crate::worker_pool::WorkerPool;
use application_ports::command::{CommandDispatcherPort, CommandEvent, DispatchOutcome};
use async_trait::async_trait;
use domain::permission::validate_permissions;
use domain_shared::discord::UserId;
use domain_shared::rank::Rank;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub struct CommandDispatcher {
    provider: CommandProvider,
    services: Arc<CommandServices>,
    worker_pool: WorkerPool,
}

impl CommandDispatcher {
    #[instrument(level = "trace", skip_all)]
    pub fn new(provider: CommandProvider, services: Arc<CommandServices>, worker_pool: WorkerPool) -> Self {
        Self {
            provider,
            services,
            worker_pool,
        }
    }

    /// Every actor is at least [`Rank::User`], with or without a stored entity.
    #[instrument(level = "debug", skip(self))]
    async fn effective_ranks(&self, user_id: UserId) -> Result<BTreeSet<Rank>, CommandError> {
        let ranks = self
            .services
            .user_repository
            .get(user_id)
            .await
            .map_err(map_user_repo_err)?
            .map(|user| user.ranks)
            .unwrap_or_default();

        let mut effective = self.services.rank_lattice.effective_ranks(&ranks)?;
        effective.insert(Rank::User);
        Ok(effective)
    }

    #[instrument(level = "debug", skip_all)]
    async fn authorize(&self, event: &CommandEvent, command: &dyn Command) -> Result<(), CommandError> {
        let ranks = self.effective_ranks(event.author.user_id).await?;

        let rank = command.rank();
        if !ranks.contains(&rank) {
            return Err(CommandError::InsufficientRank(rank));
        }

        let permissions = command.permissions();
        if !permissions.is_empty() {
            validate_permissions(&ranks, &permissions, &event.member_permissions)?;
        }

        Ok(())
    }
}

#[async_trait]
impl CommandDispatcherPort for CommandDispatcher {
    #[instrument(
        level = "info",
        skip_all,
        fields(qualified_name = %event.qualified_name(), user_id = event.author.user_id.0)
    )]
    async fn dispatch(&self, event: CommandEvent) -> DispatchOutcome {
        if event.author.is_bot {
            debug!("Ignoring command of a bot");
            return DispatchOutcome::Filtered;
        }

        let qualified_name = event.qualified_name();
        let reply = Arc::new(ReplyChannel::new(
            self.services.discord_port.clone(),
            event.reply_target.clone(),
        ));
        let context = CommandContext {
            event: event.clone(),
            services: self.services.clone(),
            reply: reply.clone(),
        };

        let mut command = match self.provider.create(context) {
            Ok(Some(command)) => command,
            Ok(None) => {
                info!("No command registered under this name");
                return DispatchOutcome::Dropped;
            }
            Err(error) => {
                report_command_error(&qualified_name, &reply, &error).await;
                return DispatchOutcome::Rejected;
            }
        };

        command.post_construct();

        let checked = match self.authorize(&event, command.as_ref()).await {
            Ok(()) => command.validate(),
            Err(error) => Err(error),
        };
        if let Err(error) = checked {
            report_command_error(&qualified_name, &reply, &error).await;
            return DispatchOutcome::Rejected;
        }

        self.worker_pool.submit(qualified_name, command, reply);
        DispatchOutcome::Submitted
    }
}
