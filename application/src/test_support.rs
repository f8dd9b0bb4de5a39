use crate::command::{CommandContext, CommandServices, CommandSettings, GuildCommandContext};
use crate::reply::ReplyChannel;
use crate::site::SiteCache;
use application_ports::command::{Author, CommandEvent};
use async_trait::async_trait;
use chrono::Utc;
use domain::cache::{MockAutoResponseCache, MockPatternCache};
use domain::guard::MemberGuard;
use domain::guild::{GuildEntity, GuildRepository, GuildRepositoryError};
use domain::ports::discord::MockDiscordPort;
use domain::ports::lifecycle::MockLifecyclePort;
use domain::rank::RankLattice;
use domain::user::MockUserRepository;
use domain::webhook::MockWebhookRepository;
use domain_shared::argument::Argument;
use domain_shared::discord::{ChannelId, GuildId, MessageId, ReplyTarget, UserId};
use domain_shared::permission::PermissionSet;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const GUILD_ID: GuildId = GuildId(100);
pub const CHANNEL_ID: ChannelId = ChannelId(200);
pub const AUTHOR_ID: UserId = UserId(300);

/// Guild repository keeping entities in memory and counting writes.
#[derive(Default)]
pub struct InMemoryGuildRepository {
    guilds: Mutex<HashMap<GuildId, GuildEntity>>,
    puts: Mutex<usize>,
}

impl InMemoryGuildRepository {
    pub fn with(entity: GuildEntity) -> Self {
        let repository = Self::default();
        repository
            .guilds
            .lock()
            .unwrap()
            .insert(entity.guild_id, entity);
        repository
    }

    pub fn stored(&self, guild_id: GuildId) -> Option<GuildEntity> {
        self.guilds.lock().unwrap().get(&guild_id).cloned()
    }

    pub fn puts(&self) -> usize {
        *self.puts.lock().unwrap()
    }
}

#[async_trait]
impl GuildRepository for InMemoryGuildRepository {
    async fn get(&self, guild_id: GuildId) -> Result<Option<GuildEntity>, GuildRepositoryError> {
        Ok(self.stored(guild_id))
    }

    async fn put(&self, entity: &GuildEntity) -> Result<u64, GuildRepositoryError> {
        *self.puts.lock().unwrap() += 1;
        self.guilds
            .lock()
            .unwrap()
            .insert(entity.guild_id, entity.clone());
        Ok(1)
    }

    async fn delete(&self, guild_id: GuildId) -> Result<u64, GuildRepositoryError> {
        Ok(self.guilds.lock().unwrap().remove(&guild_id).map_or(0, |_| 1))
    }

    async fn find_all(&self) -> Result<Vec<GuildEntity>, GuildRepositoryError> {
        Ok(self.guilds.lock().unwrap().values().cloned().collect())
    }
}

pub struct TestServices {
    pub discord_port: MockDiscordPort,
    pub lifecycle_port: MockLifecyclePort,
    pub guild_repository: Arc<InMemoryGuildRepository>,
    pub user_repository: MockUserRepository,
    pub webhook_repository: MockWebhookRepository,
    pub pattern_cache: MockPatternCache,
    pub auto_response_cache: MockAutoResponseCache,
    pub member_guard: Arc<MemberGuard>,
}

impl TestServices {
    pub fn new() -> Self {
        Self {
            discord_port: MockDiscordPort::new(),
            lifecycle_port: MockLifecyclePort::new(),
            guild_repository: Arc::new(InMemoryGuildRepository::default()),
            user_repository: MockUserRepository::new(),
            webhook_repository: MockWebhookRepository::new(),
            pattern_cache: MockPatternCache::new(),
            auto_response_cache: MockAutoResponseCache::new(),
            member_guard: Arc::new(MemberGuard::new()),
        }
    }

    pub fn build(self) -> Arc<CommandServices> {
        let discord_port = Arc::new(self.discord_port);

        Arc::new(CommandServices {
            discord_port: discord_port.clone(),
            lifecycle_port: Arc::new(self.lifecycle_port),
            guild_repository: self.guild_repository,
            user_repository: Arc::new(self.user_repository),
            webhook_repository: Arc::new(self.webhook_repository),
            pattern_cache: Arc::new(self.pattern_cache),
            auto_response_cache: Arc::new(self.auto_response_cache),
            site_cache: Arc::new(SiteCache::new(discord_port)),
            member_guard: self.member_guard,
            rank_lattice: Arc::new(RankLattice::default()),
            settings: CommandSettings {
                guard_timeout: Duration::from_millis(50),
                support_invite: None,
                worker_threads: 2,
                started_at: Utc::now(),
            },
        })
    }
}

/// A text command sent in [`GUILD_ID`] by a human without channel permissions.
pub fn command_event(qualified_name: &str, arguments: &[&str]) -> CommandEvent {
    let parts: Vec<&str> = qualified_name.split('.').collect();
    let (subcommand_group, subcommand) = match parts.as_slice() {
        [_, group, subcommand] => (Some(group.to_string()), Some(subcommand.to_string())),
        [_, subcommand] => (None, Some(subcommand.to_string())),
        _ => (None, None),
    };

    CommandEvent {
        name: parts[0].to_string(),
        subcommand_group,
        subcommand,
        arguments: arguments.iter().map(|argument| Argument::text(*argument)).collect(),
        options: BTreeMap::new(),
        author: Author {
            user_id: AUTHOR_ID,
            name: "author".to_string(),
            is_bot: false,
        },
        guild_id: Some(GUILD_ID),
        channel_id: CHANNEL_ID,
        member_permissions: PermissionSet::new(),
        reply_target: ReplyTarget::Message {
            channel_id: CHANNEL_ID,
            message_id: MessageId(400),
        },
    }
}

/// Context of [`command_event`] inside [`GUILD_ID`].
pub fn guild_context(services: TestServices, qualified_name: &str, arguments: &[&str]) -> GuildCommandContext {
    let services = services.build();
    let event = command_event(qualified_name, arguments);
    GuildCommandContext {
        guild_id: GUILD_ID,
        context: CommandContext {
            reply: Arc::new(ReplyChannel::new(
                services.discord_port.clone(),
                event.reply_target.clone(),
            )),
            services,
            event,
        },
    }
}
