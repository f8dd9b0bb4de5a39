#[cfg_attr(feature = "mock", mockall::automock)]
pub trait LifecyclePort {
    /// Asks the bot to disconnect from the gateway and exit.
    fn shutdown(&self);
}
