//! Notification delivery to subscribers.
//!
//! This module provides:
//! - [`Notifier`]: the delivery collaborator trait
//! - [`TelegramNotifier`]: delivery via the Telegram Bot API
//! - [`MessageComposer`]: change/failure notice text
//! - [`DeliveryError`]: uniform "subscriber unreachable" error

mod error;
mod message;
mod telegram;


pub use error::DeliveryError;
pub use message::MessageComposer;
pub use telegram::TelegramNotifier;

use crate::registry::SubscriberId;

/// Trait for delivering a notice to a single subscriber.
///
/// All delivery failures are treated uniformly by callers as "this
/// subscriber is now unreachable"; the dispatcher prunes the subscriber
/// and moves on. Implementations make no retry attempts of their own.
pub trait Notifier: Send + Sync {
    /// Delivers `text` to the given subscriber.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] if the subscriber could not be reached
    /// (blocked the sender, invalid id, transient network error).
    fn deliver(
        &self,
        subscriber: SubscriberId,
        text: &str,
    ) -> impl std::future::Future<Output = Result<(), DeliveryError>> + Send;
}
