use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CleanupReport {
    pub evicted_guards: usize,
    pub evicted_sites: usize,
}

#[async_trait]
pub trait CleanupJobHandlerPort {
    async fn tick(&self) -> CleanupReport;
}
