//! Task source: fetching the raw task-list text.
//!
//! The core treats any fetch failure uniformly as "this cycle's fetch
//! failed"; no status-code-specific recovery exists.

mod http;

pub use http::HttpTaskSource;

use thiserror::Error;

/// Error type for task fetching operations.
///
/// Describes what went wrong without dictating recovery strategy.
/// Callers treat every variant the same way: log, skip the cycle,
/// try again next interval.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP request failed (connection, timeout, or bad URL).
    #[error("HTTP request failed: {0}")]
    Http(#[from] crate::transport::HttpError),

    /// The server answered with a non-success status.
    #[error("Unexpected status {status}")]
    Status {
        /// The non-2xx status code returned.
        status: ::http::StatusCode,
    },

    /// The response body was not valid UTF-8 text.
    #[error("Response body is not text: {reason}")]
    NotText {
        /// Description of the decoding failure.
        reason: String,
    },
}

/// Trait for fetching the raw task-list text.
///
/// # Design
///
/// - The polling loop and broadcaster depend on this trait, not on HTTP
/// - Enables dependency injection for testing with mock implementations
pub trait TaskSource: Send + Sync {
    /// Fetches the current raw text of the task list.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the resource cannot be retrieved or the
    /// body is not text. The wait is bounded by the source's configured
    /// timeout; expiry is a fetch failure like any other.
    fn fetch_text(&self) -> impl std::future::Future<Output = Result<String, FetchError>> + Send;
}
