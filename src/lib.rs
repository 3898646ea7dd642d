//! Taskwatch: task list change monitor
//!
//! A library for polling a remote newline-delimited task list,
//! detecting content changes, and notifying subscribers.

pub mod broadcast;
pub mod config;
pub mod monitor;
pub mod notify;
pub mod registry;
pub mod source;
pub mod tasks;
pub mod transport;
