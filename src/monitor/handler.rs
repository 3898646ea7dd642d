//! The change callback abstraction.

use std::convert::Infallible;

use crate::tasks::TaskList;

/// Callback invoked by [`PollingLoop`] when the task list changes.
///
/// Replaces an optional "callable or nothing" parameter with an explicit
/// capability: callers that want no callback pass [`NoopHandler`]. Handler
/// errors are logged by the loop and never stop polling.
///
/// [`PollingLoop`]: super::PollingLoop
pub trait ChangeHandler: Send {
    /// Error type reported back to the loop (logged, not propagated).
    type Error: std::error::Error + Send;

    /// Called with the newly observed task list, before it replaces the
    /// loop's stored state.
    fn on_change(
        &mut self,
        tasks: TaskList,
    ) -> impl std::future::Future<Output = Result<(), Self::Error>> + Send;
}

/// A handler that does nothing.
///
/// The defined no-op default for callers that only want the loop's own
/// logging and state tracking.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHandler;

impl ChangeHandler for NoopHandler {
    type Error = Infallible;

    async fn on_change(&mut self, _tasks: TaskList) -> Result<(), Infallible> {
        Ok(())
    }
}
