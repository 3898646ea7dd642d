//! Change broadcasting: one fetch/compare/deliver cycle per tick.
//!
//! [`Broadcaster`] owns the subscriber set and the last-known task list
//! for the broadcast entry point. Each cycle runs to completion; failures
//! never escape a cycle — fetch failures become a failure notice, delivery
//! failures prune the subscriber and the round continues.

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

use crate::notify::{MessageComposer, Notifier};
use crate::registry::{LoadResult, RegistryStore, SubscriberSet};
use crate::source::TaskSource;
use crate::tasks::{TaskList, has_changed};

/// Dispatches change notices to every subscriber, pruning unreachable ones.
///
/// Owns the live [`SubscriberSet`] and the last-known [`TaskList`]; both
/// are only ever mutated from within [`run_cycle`], and cycles never
/// overlap (the caller awaits each cycle before starting the next).
///
/// # Type Parameters
///
/// * `S` - The [`TaskSource`] used to fetch the list
/// * `N` - The [`Notifier`] used for delivery
/// * `R` - The [`RegistryStore`] used to persist prunes
///
/// [`run_cycle`]: Self::run_cycle
pub struct Broadcaster<S, N, R> {
    source: S,
    notifier: N,
    store: R,
    composer: MessageComposer,
    subscribers: SubscriberSet,
    last: Option<TaskList>,
    dry_run: bool,
}

impl<S, N, R> Broadcaster<S, N, R> {
    /// Creates a broadcaster over an initial subscriber set.
    ///
    /// The last-known list starts unset, so the first cycle that fetches
    /// successfully reports its content as a change.
    #[must_use]
    pub const fn new(source: S, notifier: N, store: R, subscribers: SubscriberSet) -> Self {
        Self {
            source,
            notifier,
            store,
            composer: MessageComposer::new(),
            subscribers,
            last: None,
            dry_run: false,
        }
    }

    /// Sets the notice composer (for template support).
    #[must_use]
    pub fn with_composer(mut self, composer: MessageComposer) -> Self {
        self.composer = composer;
        self
    }

    /// Enables dry-run mode: notices are logged but not delivered, and
    /// nothing is pruned or persisted.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Returns the current subscriber set.
    #[must_use]
    pub const fn subscribers(&self) -> &SubscriberSet {
        &self.subscribers
    }

    /// Returns the last-known task list, if any cycle has observed one.
    #[must_use]
    pub const fn last_tasks(&self) -> Option<&TaskList> {
        self.last.as_ref()
    }
}

impl<S, N, R> Broadcaster<S, N, R>
where
    S: TaskSource,
    N: Notifier,
    R: RegistryStore,
{
    /// Runs one broadcast cycle: fetch, compare, deliver.
    ///
    /// - Re-reads the registry first, so subscribe/unsubscribe edits made
    ///   by other processes apply before this cycle delivers or prunes.
    /// - With no subscribers, does nothing (not even the fetch).
    /// - On fetch failure, delivers a failure notice to every subscriber
    ///   and leaves the last-known list untouched.
    /// - On an unchanged list, returns with no side effects.
    /// - On change, updates the last-known list, then delivers the change
    ///   notice to a stable snapshot of the set.
    ///
    /// Every delivery failure prunes that subscriber and persists the
    /// updated set immediately; one failure never aborts the round. This
    /// method never fails — all errors are logged and recovered locally.
    pub async fn run_cycle(&mut self) {
        self.refresh_subscribers();

        if self.subscribers.is_empty() {
            tracing::trace!("No subscribers, skipping check");
            return;
        }

        let raw = match self.source.fetch_text().await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Task list fetch failed: {e}");
                let notice = self.composer.failure_notice(&e);
                self.deliver_round(&notice).await;
                return;
            }
        };

        let current = TaskList::normalize(&raw);
        if !has_changed(self.last.as_ref(), &current) {
            tracing::debug!("Task list unchanged ({} task(s))", current.len());
            return;
        }

        tracing::info!(
            "Task list changed: {} -> {} task(s)",
            self.last.as_ref().map_or(0, TaskList::len),
            current.len()
        );

        // State is promoted before delivery; delivery outcome never rolls
        // the observation back.
        let notice = self.composer.change_notice(&current);
        self.last = Some(current);

        self.deliver_round(&notice).await;
    }

    /// Adopts registry edits made outside this process.
    ///
    /// The registry file is the shared source of truth: subscribe and
    /// unsubscribe commands may run while the daemon is up, so each cycle
    /// re-reads the file before delivering or pruning against it. A missing
    /// file means no external edit happened; a corrupted file keeps the
    /// in-memory set, which the next prune-save overwrites.
    fn refresh_subscribers(&mut self) {
        match self.store.load() {
            LoadResult::Loaded(set) => {
                if set != self.subscribers {
                    tracing::info!(
                        "Registry changed externally: {} -> {} subscriber(s)",
                        self.subscribers.len(),
                        set.len()
                    );
                }
                self.subscribers = set;
            }
            LoadResult::NotFound => {}
            LoadResult::Corrupted { reason } => {
                tracing::warn!("Registry file corrupted ({reason}), keeping current set");
            }
        }
    }

    /// Delivers `text` to a stable snapshot of the current subscribers.
    ///
    /// Unreachable subscribers are removed from the live set and the set
    /// is persisted after each removal.
    async fn deliver_round(&mut self, text: &str) {
        if self.dry_run {
            tracing::info!(
                "Dry-run: would deliver to {} subscriber(s):\n{text}",
                self.subscribers.len()
            );
            return;
        }

        for id in self.subscribers.snapshot() {
            match self.notifier.deliver(id, text).await {
                Ok(()) => {
                    tracing::debug!("Delivered notice to {id}");
                }
                Err(e) => {
                    tracing::warn!("Could not deliver to {id}, unsubscribing: {e}");
                    self.subscribers.unsubscribe(id);
                    if let Err(e) = self.store.save(&self.subscribers).await {
                        tracing::warn!("Could not persist subscriber set: {e}");
                    }
                }
            }
        }
    }
}
