//! Subscriber registry: identifiers, the in-memory set, and persistence.
//!
//! This module provides:
//! - [`SubscriberId`]: an opaque numeric notification destination
//! - [`SubscriberSet`]: the in-memory set with idempotent add/remove
//! - [`RegistryStore`] / [`FileRegistryStore`]: persistence across restarts
//! - [`LoadResult`] / [`StoreError`]: read-side degradation and write errors

mod store;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use store::{FileRegistryStore, LoadResult, RegistryStore, StoreError};

#[cfg(test)]
pub use store::mock;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An opaque subscriber identifier (a Telegram chat id).
///
/// Stored as a signed integer; ordering is only used to keep persisted
/// output deterministic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SubscriberId(i64);

impl SubscriberId {
    /// Creates a subscriber id from its raw value.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for SubscriberId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl FromStr for SubscriberId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self)
    }
}

/// The set of subscribers to notify.
///
/// Membership is unique; add and remove are idempotent. Iteration and
/// serialization are in sorted order so persisted output is deterministic
/// and diff-friendly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriberSet(BTreeSet<SubscriberId>);

impl SubscriberSet {
    /// Creates an empty subscriber set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Adds a subscriber. Returns `true` if it was not already present.
    pub fn subscribe(&mut self, id: SubscriberId) -> bool {
        self.0.insert(id)
    }

    /// Removes a subscriber. Returns `true` if it was present.
    ///
    /// Removing an absent subscriber is not an error.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.0.remove(&id)
    }

    /// Returns `true` if the subscriber is in the set.
    #[must_use]
    pub fn contains(&self, id: SubscriberId) -> bool {
        self.0.contains(&id)
    }

    /// Returns the number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a stable snapshot of the current membership, sorted.
    ///
    /// Delivery rounds iterate over a snapshot so that removals during the
    /// round do not affect who receives that round's message.
    #[must_use]
    pub fn snapshot(&self) -> Vec<SubscriberId> {
        self.0.iter().copied().collect()
    }

    /// Iterates over the subscribers in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = SubscriberId> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<SubscriberId> for SubscriberSet {
    fn from_iter<I: IntoIterator<Item = SubscriberId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromIterator<i64> for SubscriberSet {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        iter.into_iter().map(SubscriberId::new).collect()
    }
}
