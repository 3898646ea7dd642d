//! Pure change detection between task list observations.

use super::TaskList;

/// Returns `true` if `current` differs from the last-known list.
///
/// The comparison is by value: length *and* every element, in order. A list
/// of the same length with different content counts as changed.
///
/// An unset `previous` (first observation) counts as changed; callers decide
/// whether a first observation is reported or only seeds state (the polling
/// loop seeds silently, the broadcaster notifies).
///
/// Pure function; no side effects, no I/O.
#[must_use]
pub fn has_changed(previous: Option<&TaskList>, current: &TaskList) -> bool {
    previous.is_none_or(|prev| prev != current)
}
