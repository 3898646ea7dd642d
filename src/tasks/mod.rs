//! Task list types and change detection.
//!
//! This module provides:
//! - [`TaskList`]: an ordered, order-sensitive sequence of task lines
//! - [`TaskList::normalize`]: turning raw fetched text into a comparable list
//! - [`has_changed`]: pure content comparison against the last-known list

mod change;
mod list;


pub use change::has_changed;
pub use list::TaskList;
