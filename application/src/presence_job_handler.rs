use application_ports::presence_job_handler::{PresenceJobHandlerError, PresenceJobHandlerPort};
use async_trait::async_trait;
use domain::ports::presence::{PresenceError, PresencePort};
use rand::seq::SliceRandom;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Shows a randomly picked activity.
pub struct PresenceJobHandler {
    presence_port: Arc<dyn PresencePort + Send + Sync>,
    activities: Vec<String>,
}

impl PresenceJobHandler {
    #[instrument(level = "trace", skip_all)]
    pub fn new(presence_port: Arc<dyn PresencePort + Send + Sync>, activities: Vec<String>) -> Self {
        let activities = activities
            .into_iter()
            .map(|activity| activity.trim().to_string())
            .filter(|activity| !activity.is_empty())
            .collect();

        Self {
            presence_port,
            activities,
        }
    }
}

#[async_trait]
impl PresenceJobHandlerPort for PresenceJobHandler {
    #[instrument(level = "debug", skip(self))]
    async fn tick(&self) -> Result<(), PresenceJobHandlerError> {
        let activity = self
            .activities
            .choose(&mut rand::thread_rng())
            .ok_or(PresenceJobHandlerError::NoActivities)?;

        self.presence_port
            .set_activity(activity)
            .await
            .map_err(map_presence_err)?;
        info!(activity = %activity, "Activity updated");

        Ok(())
    }
}

#[instrument(level = "trace", skip_all)]
fn map_presence_err(err: PresenceError) -> PresenceJobHandlerError {
    match err {
        PresenceError::NotConnected => {
            warn!("PresenceError::NotConnected");
            PresenceJobHandlerError::TemporaryUnavailable
        }
    }
}
