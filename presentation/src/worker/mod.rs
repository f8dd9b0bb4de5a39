mod cleanup_job;
mod presence_job;
mod reddit_feed_job;

use crate::application_ports::Locator;
use crate::worker::cleanup_job::run_cleanup_job_handler;
use crate::worker::presence_job::run_presence_job_handler;
use crate::worker::reddit_feed_job::run_reddit_feed_job_handler;
use tracing::instrument;

pub type Error = Box<dyn std::error::Error + Send + Sync>;

#[instrument(level = "debug", skip(locator))]
pub async fn run_worker<L: Locator + Clone + Send + Sync + 'static>(locator: L) -> Result<(), Error> {
    let reddit_feed_handle = tokio::spawn(run_reddit_feed_job_handler(locator.clone()));
    let cleanup_handle = tokio::spawn(run_cleanup_job_handler(locator.clone()));
    let presence_handle = tokio::spawn(run_presence_job_handler(locator.clone()));

    reddit_feed_handle.await?;
    cleanup_handle.await?;
    presence_handle.await?;

    Ok(())
}
