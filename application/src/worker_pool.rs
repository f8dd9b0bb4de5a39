use crate::command::{Command, CommandError};
use crate::reply::{report_command_error, ReplyChannel};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, error, info_span, instrument, Instrument};

/// Runs commands with bounded concurrency.
///
/// Every command runs in its own task, so a failing or panicking command only
/// produces an error message for its author.
#[derive(Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    #[instrument(level = "trace")]
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn active_jobs(&self) -> usize {
        self.size - self.permits.available_permits()
    }

    #[instrument(level = "debug", skip(self, command, reply))]
    pub fn submit(
        &self,
        qualified_name: String,
        command: Box<dyn Command>,
        reply: Arc<ReplyChannel>,
    ) -> JoinHandle<()> {
        let permits = self.permits.clone();
        let span = info_span!("command", qualified_name = %qualified_name);

        tokio::spawn(
            async move {
                let _permit = match permits.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        error!("Worker pool is closed");
                        return;
                    }
                };

                let job = tokio::spawn(async move { command.run().await }.in_current_span());

                let error = match job.await {
                    Ok(Ok(())) => {
                        debug!("Command finished");
                        return;
                    }
                    Ok(Err(error)) => error,
                    Err(join_error) => {
                        error!(error = %join_error, "Command panicked");
                        CommandError::Unhandled("The command crashed".to_string())
                    }
                };

                report_command_error(&qualified_name, &reply, &error).await;
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use domain::ports::discord::MockDiscordPort;
    use domain_shared::discord::{ChannelId, MessageId, ReplyTarget};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct Sleeper {
        running: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Command for Sleeper {
        async fn run(&self) -> Result<(), CommandError> {
            let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(30)).await;
            self.running.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Panicking;

    #[async_trait]
    impl Command for Panicking {
        async fn run(&self) -> Result<(), CommandError> {
            panic!("boom")
        }
    }

    fn reply(discord_port: MockDiscordPort) -> Arc<ReplyChannel> {
        Arc::new(ReplyChannel::new(
            Arc::new(discord_port),
            ReplyTarget::Message {
                channel_id: ChannelId(1),
                message_id: MessageId(1),
            },
        ))
    }

    #[tokio::test]
    async fn concurrency_is_bounded_by_size() {
        let pool = WorkerPool::new(2);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..6)
            .map(|_| {
                pool.submit(
                    "sleep".to_string(),
                    Box::new(Sleeper {
                        running: running.clone(),
                        peak: peak.clone(),
                    }),
                    reply(MockDiscordPort::new()),
                )
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(peak.load(Ordering::SeqCst), 2);
        assert_eq!(pool.active_jobs(), 0);
    }

    #[tokio::test]
    async fn panic_is_reported_once() {
        let pool = WorkerPool::new(1);
        let mut discord_port = MockDiscordPort::new();
        discord_port
            .expect_reply()
            .times(1)
            .withf(|_, message| message.embeds[0].title.as_deref() == Some("Something went wrong"))
            .returning(|_, _| Ok(MessageId(2)));

        pool.submit("panic".to_string(), Box::new(Panicking), reply(discord_port))
            .await
            .unwrap();
    }
}
