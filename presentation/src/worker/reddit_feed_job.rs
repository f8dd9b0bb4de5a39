use crate::application_ports::Locator;
use application_ports::reddit_feed_job_handler::RedditFeedJobHandlerError;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

const POLL_INTERVAL: Duration = Duration::from_secs(60);

#[instrument(level = "debug", skip(locator))]
pub async fn run_reddit_feed_job_handler<L: Locator + Send + Sync + 'static>(locator: L) {
    let handler = locator.get_reddit_feed_job_handler_port();
    let mut unavailable_sleep_duration: Option<Duration> = None;
    loop {
        tokio::time::sleep(POLL_INTERVAL).await;

        let error = match handler.tick().await {
            Ok(()) => {
                unavailable_sleep_duration = None;
                continue;
            }
            Err(error) => error,
        };

        match error {
            RedditFeedJobHandlerError::NoSubscriptions => {
                debug!("No subreddit is subscribed");
            }
            RedditFeedJobHandlerError::TemporaryUnavailable => {
                let duration = unavailable_sleep_duration
                    .map(|d| d * 2)
                    .unwrap_or(Duration::from_secs(3));
                if duration >= Duration::from_secs(90) {
                    error!(
                        "Reddit feed job handler temporarily unavailable. Sleeping for {} seconds.",
                        duration.as_secs(),
                    );
                }
                unavailable_sleep_duration = Some(duration);
                warn!(
                    "Reddit feed job handler temporarily unavailable. Sleeping for {} seconds.",
                    duration.as_secs(),
                );
                tokio::time::sleep(duration).await;
            }
        }
    }
}
