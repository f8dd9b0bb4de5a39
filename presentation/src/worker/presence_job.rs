use crate::application_ports::Locator;
use application_ports::presence_job_handler::PresenceJobHandlerError;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

const PRESENCE_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[instrument(level = "debug", skip(locator))]
pub async fn run_presence_job_handler<L: Locator + Send + Sync + 'static>(locator: L) {
    let handler = locator.get_presence_job_handler_port();
    let mut unavailable_sleep_duration: Option<Duration> = None;
    loop {
        let error = match handler.tick().await {
            Ok(()) => {
                unavailable_sleep_duration = None;
                tokio::time::sleep(PRESENCE_INTERVAL).await;
                continue;
            }
            Err(error) => error,
        };

        match error {
            PresenceJobHandlerError::NoActivities => {
                debug!("No activity is configured, presence job stopped");
                return;
            }
            PresenceJobHandlerError::TemporaryUnavailable => {
                let duration = unavailable_sleep_duration
                    .map(|d| d * 2)
                    .unwrap_or(Duration::from_secs(3));
                if duration >= Duration::from_secs(90) {
                    error!(
                        "Presence job handler temporarily unavailable. Sleeping for {} seconds.",
                        duration.as_secs(),
                    );
                }
                unavailable_sleep_duration = Some(duration);
                warn!(
                    "Presence job handler temporarily unavailable. Sleeping for {} seconds.",
                    duration.as_secs(),
                );
                tokio::time::sleep(duration).await;
            }
        }
    }
}
