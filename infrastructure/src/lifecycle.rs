use domain::ports::lifecycle::LifecyclePort;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{info, instrument};

/// Wakes whoever waits on the shared [`Notify`] to take the bot down.
pub struct NotifyLifecycleAdapter {
    shutdown: Arc<Notify>,
}

impl NotifyLifecycleAdapter {
    pub fn new(shutdown: Arc<Notify>) -> Self {
        Self { shutdown }
    }
}

impl LifecyclePort for NotifyLifecycleAdapter {
    #[instrument(level = "info", skip(self))]
    fn shutdown(&self) {
        info!("Shutdown requested");
        self.shutdown.notify_one();
    }
}
