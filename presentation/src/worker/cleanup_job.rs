use crate::application_ports::Locator;
use std::time::Duration;
use tracing::{info, instrument};

const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[instrument(level = "debug", skip(locator))]
pub async fn run_cleanup_job_handler<L: Locator + Send + Sync + 'static>(locator: L) {
    let handler = locator.get_cleanup_job_handler_port();
    loop {
        tokio::time::sleep(CLEANUP_INTERVAL).await;

        let report = handler.tick().await;
        info!(
            evicted_guards = report.evicted_guards,
            evicted_sites = report.evicted_sites,
            "Cleanup finished"
        );
    }
}
