pub mod cleanup_job_handler;
pub mod command;
pub mod message;
pub mod presence_job_handler;
pub mod reddit_feed_job_handler;
pub mod site;
