//! Error types for notification delivery.

use thiserror::Error;

use crate::transport::HttpError;

/// Error type for delivering a notice to a subscriber.
///
/// The dispatcher treats every variant the same way: the subscriber is
/// unreachable and is pruned from the registry. The variants exist for
/// logging, not for differentiated recovery.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The HTTP request to the delivery endpoint failed.
    #[error("Delivery request failed: {0}")]
    Http(#[from] HttpError),

    /// The delivery endpoint rejected the message (blocked bot, unknown
    /// chat id, malformed request).
    #[error("Delivery rejected with status {status}")]
    Rejected {
        /// The non-2xx status code returned.
        status: ::http::StatusCode,
        /// Response body, if it was text (for logging).
        body: Option<String>,
    },

    /// The delivery endpoint URL could not be constructed.
    ///
    /// Indicates a configuration problem (bad API base or token), not a
    /// per-subscriber failure.
    #[error("Invalid delivery endpoint: {0}")]
    Endpoint(String),
}
