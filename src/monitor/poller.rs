//! The polling loop and its stop handle.

use std::time::Duration;

use tokio_stream::{StreamExt, wrappers::IntervalStream};
use tokio_util::sync::CancellationToken;

use crate::source::TaskSource;
use crate::tasks::{TaskList, has_changed};

use super::ChangeHandler;

/// Cooperative stop control for a [`PollingLoop`].
///
/// `stop` is idempotent and may be called from any task or thread. The
/// loop observes the request between cycles — an in-flight fetch or
/// handler call is never interrupted, but the inter-cycle sleep is.
#[derive(Debug, Clone)]
pub struct StopHandle {
    token: CancellationToken,
}

impl StopHandle {
    /// Requests the loop to stop after its current cycle.
    pub fn stop(&self) {
        self.token.cancel();
    }

    /// Returns `true` if a stop has been requested.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Periodically fetches and normalizes the task list, invoking a
/// [`ChangeHandler`] when the content changes.
///
/// The first successful fetch seeds the stored state silently; the handler
/// only runs for subsequent content changes. Fetch failures are logged and
/// the loop proceeds to the next interval — transient network errors never
/// stop polling.
///
/// At most one loop per handle can ever run: [`run`] consumes the loop, so
/// a monitoring job cannot be started twice.
///
/// [`run`]: Self::run
pub struct PollingLoop<S> {
    source: S,
    interval: Duration,
    last: Option<TaskList>,
    token: CancellationToken,
}

impl<S> PollingLoop<S> {
    /// Creates a polling loop over the given source and interval.
    #[must_use]
    pub fn new(source: S, interval: Duration) -> Self {
        Self {
            source,
            interval,
            last: None,
            token: CancellationToken::new(),
        }
    }

    /// Returns a handle that can stop this loop.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            token: self.token.clone(),
        }
    }

    /// Returns the configured polling interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

impl<S: TaskSource> PollingLoop<S> {
    /// Runs the loop until stopped via a [`StopHandle`].
    ///
    /// Each iteration: fetch + normalize, compare by value to the stored
    /// last-observed list, invoke the handler on change, store the current
    /// list regardless, then wait out the interval. Handler errors are
    /// logged and do not stop the loop.
    pub async fn run<H: ChangeHandler>(mut self, mut handler: H) {
        let mut ticker = IntervalStream::new(tokio::time::interval(self.interval));

        loop {
            if self.token.is_cancelled() {
                tracing::info!("Polling loop stopped");
                return;
            }

            // The first tick completes immediately; later ticks pace the loop.
            tokio::select! {
                () = self.token.cancelled() => continue,
                _ = ticker.next() => {}
            }

            if self.token.is_cancelled() {
                continue;
            }

            self.run_cycle(&mut handler).await;
        }
    }

    /// Performs a single fetch/compare/notify cycle.
    async fn run_cycle<H: ChangeHandler>(&mut self, handler: &mut H) {
        let raw = match self.source.fetch_text().await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Task list fetch failed, will retry next interval: {e}");
                return;
            }
        };

        let current = TaskList::normalize(&raw);
        let changed = has_changed(self.last.as_ref(), &current);

        if changed {
            if self.last.is_some() {
                if let Err(e) = handler.on_change(current.clone()).await {
                    tracing::warn!("Change handler failed: {e}");
                }
            } else {
                // First observation seeds state without notifying.
                tracing::info!("Observed initial task list ({} task(s))", current.len());
            }
        }

        self.last = Some(current);
    }
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;
