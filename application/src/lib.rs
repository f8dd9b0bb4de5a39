pub mod cache;
pub mod cleanup_job_handler;
pub mod command;
pub mod dispatcher;
pub mod feed;
pub mod message_listener;
pub mod owner;
pub mod presence_job_handler;
pub mod reddit_feed_job_handler;
pub mod reply;
pub mod site;
pub mod worker_pool;

#[cfg(test)]
mod test_support;
