use application_ports::cleanup_job_handler::CleanupJobHandlerPort;
use application_ports::command::CommandDispatcherPort;
use application_ports::message::MessageListenerPort;
use application_ports::presence_job_handler::PresenceJobHandlerPort;
use application_ports::reddit_feed_job_handler::RedditFeedJobHandlerPort;
use application_ports::site::SitePort;
use std::sync::Arc;

pub trait Locator {
    fn get_command_dispatcher_port(&self) -> Arc<dyn CommandDispatcherPort + Send + Sync>;
    fn get_message_listener_port(&self) -> Arc<dyn MessageListenerPort + Send + Sync>;
    fn get_site_port(&self) -> Arc<dyn SitePort + Send + Sync>;
    fn get_reddit_feed_job_handler_port(&self) -> Arc<dyn RedditFeedJobHandlerPort + Send + Sync>;
    fn get_cleanup_job_handler_port(&self) -> Arc<dyn CleanupJobHandlerPort + Send + Sync>;
    fn get_presence_job_handler_port(&self) -> Arc<dyn PresenceJobHandlerPort + Send + Sync>;
    /// Prefix of text commands, e.g. `b:`.
    fn command_prefix(&self) -> &str;
}
