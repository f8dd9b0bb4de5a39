use crate::site::SiteCache;
use application_ports::cleanup_job_handler::{CleanupJobHandlerPort, CleanupReport};
use async_trait::async_trait;
use domain::guard::MemberGuard;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

/// Drops idle member guards and expired sites.
pub struct CleanupJobHandler {
    member_guard: Arc<MemberGuard>,
    site_cache: Arc<SiteCache>,
    guard_idle: Duration,
    site_max_age: Duration,
}

impl CleanupJobHandler {
    #[instrument(level = "trace", skip_all)]
    pub fn new(
        member_guard: Arc<MemberGuard>,
        site_cache: Arc<SiteCache>,
        guard_idle: Duration,
        site_max_age: Duration,
    ) -> Self {
        Self {
            member_guard,
            site_cache,
            guard_idle,
            site_max_age,
        }
    }
}

#[async_trait]
impl CleanupJobHandlerPort for CleanupJobHandler {
    #[instrument(level = "debug", skip(self))]
    async fn tick(&self) -> CleanupReport {
        let report = CleanupReport {
            evicted_guards: self.member_guard.evict_idle(self.guard_idle),
            evicted_sites: self.site_cache.evict_older_than(self.site_max_age),
        };

        info!(
            evicted_guards = report.evicted_guards,
            evicted_sites = report.evicted_sites,
            "Cleanup finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::ports::discord::MockDiscordPort;
    use domain_shared::discord::UserId;

    #[tokio::test]
    async fn evicts_idle_guards() {
        let member_guard = Arc::new(MemberGuard::new());
        drop(
            member_guard
                .acquire(UserId(1), Duration::from_millis(50))
                .await
                .unwrap(),
        );
        let handler = CleanupJobHandler::new(
            member_guard.clone(),
            Arc::new(SiteCache::new(Arc::new(MockDiscordPort::new()))),
            Duration::ZERO,
            Duration::from_secs(3600),
        );

        let report = handler.tick().await;

        assert_eq!(
            report,
            CleanupReport {
                evicted_guards: 1,
                evicted_sites: 0
            }
        );
        assert!(member_guard.is_empty());
    }
}
