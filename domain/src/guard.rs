use dashmap::DashMap;
use domain_shared::discord::UserId;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use thiserror::Error;
use tracing::{debug, instrument, warn};

#[derive(Debug, Error)]
pub enum GuardError {
    #[error("Timed out after {}s waiting for the previous action of this member", timeout.as_secs())]
    Timeout { user_id: UserId, timeout: Duration },
    #[error("Guard is closed")]
    Closed,
}

struct GuardEntry {
    semaphore: Arc<Semaphore>,
    last_used: Instant,
}

/// Lets at most one action per member run at a time.
///
/// Entries are created on first use and dropped by [`MemberGuard::evict_idle`].
#[derive(Default)]
pub struct MemberGuard {
    entries: DashMap<UserId, GuardEntry>,
}

/// Held for the duration of the guarded action. Releases on drop.
#[derive(Debug)]
pub struct GuardPermit {
    _permit: OwnedSemaphorePermit,
}

impl MemberGuard {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn acquire(
        &self,
        user_id: UserId,
        timeout: Duration,
    ) -> Result<GuardPermit, GuardError> {
        let semaphore = {
            let mut entry = self.entries.entry(user_id).or_insert_with(|| GuardEntry {
                semaphore: Arc::new(Semaphore::new(1)),
                last_used: Instant::now(),
            });
            entry.last_used = Instant::now();
            entry.semaphore.clone()
        };

        match tokio::time::timeout(timeout, semaphore.acquire_owned()).await {
            Ok(Ok(permit)) => Ok(GuardPermit { _permit: permit }),
            Ok(Err(_)) => Err(GuardError::Closed),
            Err(_) => {
                warn!(user_id = user_id.0, "Member guard timed out");
                Err(GuardError::Timeout { user_id, timeout })
            }
        }
    }

    /// Drops entries nobody holds that were last used more than `max_idle` ago.
    #[instrument(level = "debug", skip(self))]
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let before = self.entries.len();

        self.entries.retain(|_, entry| {
            let held = entry.semaphore.available_permits() == 0;
            held || entry.last_used.elapsed() < max_idle
        });

        let evicted = before.saturating_sub(self.entries.len());
        debug!(evicted, "Evicted idle member guards");
        evicted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_millis(50);

    #[tokio::test]
    async fn second_holder_times_out() {
        let guard = MemberGuard::new();

        let _permit = guard.acquire(UserId(1), TIMEOUT).await.unwrap();
        let result = guard.acquire(UserId(1), TIMEOUT).await;

        assert!(matches!(
            result,
            Err(GuardError::Timeout {
                user_id: UserId(1),
                ..
            })
        ));
    }

    #[tokio::test]
    async fn released_permit_can_be_reacquired() {
        let guard = MemberGuard::new();

        let permit = guard.acquire(UserId(1), TIMEOUT).await.unwrap();
        drop(permit);

        assert!(guard.acquire(UserId(1), TIMEOUT).await.is_ok());
    }

    #[tokio::test]
    async fn waiter_gets_permit_after_release() {
        let guard = Arc::new(MemberGuard::new());
        let permit = guard.acquire(UserId(1), TIMEOUT).await.unwrap();

        let waiter = {
            let guard = guard.clone();
            tokio::spawn(async move { guard.acquire(UserId(1), Duration::from_secs(5)).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(permit);

        assert!(waiter.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn distinct_members_do_not_contend() {
        let guard = MemberGuard::new();

        let _first = guard.acquire(UserId(1), TIMEOUT).await.unwrap();
        let second = guard.acquire(UserId(2), TIMEOUT).await;

        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn eviction_keeps_held_entries() {
        let guard = MemberGuard::new();

        let _held = guard.acquire(UserId(1), TIMEOUT).await.unwrap();
        drop(guard.acquire(UserId(2), TIMEOUT).await.unwrap());

        let evicted = guard.evict_idle(Duration::ZERO);

        assert_eq!(evicted, 1);
        assert_eq!(guard.len(), 1);
    }

    #[tokio::test]
    async fn eviction_keeps_recent_entries() {
        let guard = MemberGuard::new();

        drop(guard.acquire(UserId(1), TIMEOUT).await.unwrap());

        assert_eq!(guard.evict_idle(Duration::from_secs(3600)), 0);
        assert_eq!(guard.len(), 1);
    }
}
