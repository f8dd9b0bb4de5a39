use crate::args::CommonArgs;
use crate::locator::ApplicationPortLocator;
use application::cache::{GuildAutoResponseCache, GuildPatternCache};
use application::cleanup_job_handler::CleanupJobHandler;
use application::command::provider::CommandProvider;
use application::command::{CommandServices, CommandSettings};
use application::dispatcher::CommandDispatcher;
use application::message_listener::MessageListener;
use application::owner::grant_owner;
use application::presence_job_handler::PresenceJobHandler;
use application::reddit_feed_job_handler::RedditFeedJobHandler;
use application::site::SiteCache;
use application::worker_pool::WorkerPool;
use chrono::Utc;
use clap::Args;
use domain::guard::MemberGuard;
use domain::rank::RankLattice;
use domain_shared::discord::{InviteLink, UserId};
use infrastructure::discord::DiscordAdapter;
use infrastructure::lifecycle::NotifyLifecycleAdapter;
use infrastructure::presence::ShardPresenceAdapter;
use infrastructure::reddit::RedditAdapter;
use infrastructure::repository::guild::PostgresGuildRepository;
use infrastructure::repository::user::PostgresUserRepository;
use infrastructure::repository::webhook::PostgresWebhookRepository;
use presentation::discord::run_bot;
use presentation::worker::run_worker;
use serenity::all::Http;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{info, instrument, warn};

#[derive(Args)]
pub struct ServeArgs {
    /// The token for the Discord bot
    #[arg(long, env = "DISCORD_BOT_TOKEN")]
    pub discord_bot_token: String,
    /// Prefix of text commands
    #[arg(long, env = "COMMAND_PREFIX", default_value = "b:")]
    pub command_prefix: String,
    /// How many commands may run at the same time
    #[arg(long, env = "WORKER_THREADS", default_value_t = 8)]
    pub worker_threads: usize,
    /// How long a command waits for another command of the same member
    #[arg(long, env = "GUARD_TIMEOUT_SECONDS", default_value_t = 60)]
    pub guard_timeout_seconds: u64,
    /// After how long an unused member guard is dropped
    #[arg(long, env = "GUARD_IDLE_SECONDS", default_value_t = 3600)]
    pub guard_idle_seconds: u64,
    /// After how long the pages of a listing stop reacting to buttons
    #[arg(long, env = "SITE_MAX_AGE_SECONDS", default_value_t = 3600)]
    pub site_max_age_seconds: u64,
    /// The user granted DEVELOPER on startup
    #[arg(long, env = "OWNER_ID")]
    pub owner_id: Option<u64>,
    /// The invite link of the support server
    #[arg(long, env = "SUPPORT_INVITE")]
    pub support_invite: Option<String>,
    #[arg(long, env = "REDDIT_USER_AGENT", default_value = "discord:blanc:v1")]
    pub reddit_user_agent: String,
    /// Activities shown as the bot's presence, one picked every hour
    #[arg(long, env = "BOT_ACTIVITIES", value_delimiter = ',', default_value = "b:support")]
    pub activities: Vec<String>,
}

#[instrument(level = "trace", skip(common_args, args))]
pub async fn run(common_args: CommonArgs, args: ServeArgs) -> anyhow::Result<()> {
    let CommonArgs { database_url, .. } = common_args;
    let ServeArgs {
        discord_bot_token,
        command_prefix,
        worker_threads,
        guard_timeout_seconds,
        guard_idle_seconds,
        site_max_age_seconds,
        owner_id,
        support_invite,
        reddit_user_agent,
        activities,
    } = args;

    let database_connection = sqlx::PgPool::connect(&database_url).await?;
    let serenity_client = Arc::new(Http::new(&discord_bot_token));
    let shutdown = Arc::new(Notify::new());
    let started_at = Utc::now();

    let discord_adapter = Arc::new(DiscordAdapter::new(serenity_client));
    let reddit_adapter = Arc::new(RedditAdapter::new(&reddit_user_agent)?);
    let lifecycle_adapter = Arc::new(NotifyLifecycleAdapter::new(shutdown.clone()));
    let presence_adapter = Arc::new(ShardPresenceAdapter::new());
    let guild_repository = Arc::new(PostgresGuildRepository::new(database_connection.clone()));
    let user_repository = Arc::new(PostgresUserRepository::new(database_connection.clone()));
    let webhook_repository = Arc::new(PostgresWebhookRepository::new(database_connection));

    if let Some(owner_id) = owner_id {
        if let Err(err) = grant_owner(user_repository.as_ref(), UserId(owner_id)).await {
            warn!("Failed to grant the owner DEVELOPER: {}", err);
        }
    }

    let pattern_cache = Arc::new(GuildPatternCache::new(guild_repository.clone()));
    let auto_response_cache = Arc::new(GuildAutoResponseCache::new(guild_repository.clone()));
    let site_cache = Arc::new(SiteCache::new(discord_adapter.clone()));
    let member_guard = Arc::new(MemberGuard::new());

    let services = Arc::new(CommandServices {
        discord_port: discord_adapter.clone(),
        lifecycle_port: lifecycle_adapter,
        guild_repository: guild_repository.clone(),
        user_repository,
        webhook_repository: webhook_repository.clone(),
        pattern_cache: pattern_cache.clone(),
        auto_response_cache: auto_response_cache.clone(),
        site_cache: site_cache.clone(),
        member_guard: member_guard.clone(),
        rank_lattice: Arc::new(RankLattice::default()),
        settings: CommandSettings {
            guard_timeout: Duration::from_secs(guard_timeout_seconds),
            support_invite: support_invite.map(InviteLink),
            worker_threads,
            started_at,
        },
    });

    let locator = ApplicationPortLocator {
        command_prefix,
        command_dispatcher: Arc::new(CommandDispatcher::new(
            CommandProvider::default(),
            services,
            WorkerPool::new(worker_threads),
        )),
        message_listener: Arc::new(MessageListener::new(
            discord_adapter.clone(),
            pattern_cache,
            auto_response_cache,
        )),
        site_port: site_cache.clone(),
        reddit_feed_job_handler: Arc::new(RedditFeedJobHandler::new(
            discord_adapter,
            reddit_adapter,
            guild_repository,
            webhook_repository,
            started_at,
        )),
        cleanup_job_handler: Arc::new(CleanupJobHandler::new(
            member_guard,
            site_cache,
            Duration::from_secs(guard_idle_seconds),
            Duration::from_secs(site_max_age_seconds),
        )),
        presence_job_handler: Arc::new(PresenceJobHandler::new(presence_adapter.clone(), activities)),
    };

    let worker = tokio::spawn(run_worker(locator.clone()));
    let bot = run_bot(locator, discord_bot_token, shutdown, move |shard_manager| {
        presence_adapter.attach(shard_manager)
    })
    .await;

    worker.abort();
    bot.map_err(|e| anyhow::anyhow!(e))?;
    info!("Bot stopped");

    Ok(())
}
