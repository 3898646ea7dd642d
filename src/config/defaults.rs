//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default polling interval in seconds.
pub const POLL_INTERVAL_SECS: u64 = 60;

/// Default per-request fetch timeout in seconds.
pub const FETCH_TIMEOUT_SECS: u64 = 30;

/// Default subscriber registry file name.
pub const REGISTRY_FILE: &str = "subscribers.json";

/// Default Telegram Bot API base URL.
pub const API_BASE: &str = "https://api.telegram.org";

/// Default polling interval as Duration.
#[must_use]
pub const fn poll_interval() -> Duration {
    Duration::from_secs(POLL_INTERVAL_SECS)
}

/// Default fetch timeout as Duration.
#[must_use]
pub const fn fetch_timeout() -> Duration {
    Duration::from_secs(FETCH_TIMEOUT_SECS)
}
