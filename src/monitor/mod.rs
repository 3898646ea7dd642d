//! The polling loop driving periodic fetch/compare cycles.
//!
//! This module provides:
//! - [`PollingLoop`]: the fetch → normalize → compare → notify loop
//! - [`StopHandle`]: cooperative cancellation from any task
//! - [`ChangeHandler`] / [`NoopHandler`]: the change callback abstraction

mod handler;
mod poller;

pub use handler::{ChangeHandler, NoopHandler};
pub use poller::{PollingLoop, StopHandle};
