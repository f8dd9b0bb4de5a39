use async_trait::async_trait;
use domain::ports::presence::{PresenceError, PresencePort};
use poise::serenity_prelude as serenity;
use std::sync::{Arc, OnceLock};
use tracing::{debug, instrument};

/// Sets the activity through the shard runners of a running client.
///
/// The shard manager only exists once the client is built, so it is attached later.
#[derive(Default)]
pub struct ShardPresenceAdapter {
    shard_manager: OnceLock<Arc<serenity::ShardManager>>,
}

impl ShardPresenceAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(level = "debug", skip_all)]
    pub fn attach(&self, shard_manager: Arc<serenity::ShardManager>) {
        if self.shard_manager.set(shard_manager).is_err() {
            debug!("Shard manager already attached");
        }
    }
}

#[async_trait]
impl PresencePort for ShardPresenceAdapter {
    #[instrument(level = "debug", skip(self))]
    async fn set_activity(&self, activity: &str) -> Result<(), PresenceError> {
        let shard_manager = self
            .shard_manager
            .get()
            .ok_or(PresenceError::NotConnected)?;

        let runners = shard_manager.runners.lock().await;
        if runners.is_empty() {
            return Err(PresenceError::NotConnected);
        }

        for runner in runners.values() {
            runner
                .runner_tx
                .set_activity(Some(serenity::ActivityData::playing(activity)));
        }

        Ok(())
    }
}
