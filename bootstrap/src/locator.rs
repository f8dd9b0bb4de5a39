use application_ports::cleanup_job_handler::CleanupJobHandlerPort;
use application_ports::command::CommandDispatcherPort;
use application_ports::message::MessageListenerPort;
use application_ports::presence_job_handler::PresenceJobHandlerPort;
use application_ports::reddit_feed_job_handler::RedditFeedJobHandlerPort;
use application_ports::site::SitePort;
use presentation::application_ports::Locator;
use std::sync::Arc;
use tracing::instrument;

#[derive(Clone)]
pub struct ApplicationPortLocator {
    pub(crate) command_prefix: String,
    pub(crate) command_dispatcher: Arc<dyn CommandDispatcherPort + Send + Sync>,
    pub(crate) message_listener: Arc<dyn MessageListenerPort + Send + Sync>,
    pub(crate) site_port: Arc<dyn SitePort + Send + Sync>,
    pub(crate) reddit_feed_job_handler: Arc<dyn RedditFeedJobHandlerPort + Send + Sync>,
    pub(crate) cleanup_job_handler: Arc<dyn CleanupJobHandlerPort + Send + Sync>,
    pub(crate) presence_job_handler: Arc<dyn PresenceJobHandlerPort + Send + Sync>,
}

impl Locator for ApplicationPortLocator {
    #[instrument(level = "trace", skip(self))]
    fn get_command_dispatcher_port(&self) -> Arc<dyn CommandDispatcherPort + Send + Sync> {
        self.command_dispatcher.clone()
    }

    #[instrument(level = "trace", skip(self))]
    fn get_message_listener_port(&self) -> Arc<dyn MessageListenerPort + Send + Sync> {
        self.message_listener.clone()
    }

    #[instrument(level = "trace", skip(self))]
    fn get_site_port(&self) -> Arc<dyn SitePort + Send + Sync> {
        self.site_port.clone()
    }

    #[instrument(level = "trace", skip(self))]
    fn get_reddit_feed_job_handler_port(&self) -> Arc<dyn RedditFeedJobHandlerPort + Send + Sync> {
        self.reddit_feed_job_handler.clone()
    }

    #[instrument(level = "trace", skip(self))]
    fn get_cleanup_job_handler_port(&self) -> Arc<dyn CleanupJobHandlerPort + Send + Sync> {
        self.cleanup_job_handler.clone()
    }

    #[instrument(level = "trace", skip(self))]
    fn get_presence_job_handler_port(&self) -> Arc<dyn PresenceJobHandlerPort + Send + Sync> {
        self.presence_job_handler.clone()
    }

    fn command_prefix(&self) -> &str {
        &self.command_prefix
    }
}
