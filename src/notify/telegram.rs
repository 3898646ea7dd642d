//! Telegram Bot API delivery implementation.

use serde::Serialize;
use url::Url;

use crate::registry::SubscriberId;
use crate::transport::{HttpClient, HttpRequest};

use super::{DeliveryError, Notifier};

/// Delivers notices as Telegram messages via the Bot API `sendMessage` call.
///
/// Subscriber identifiers are Telegram chat ids. Any transport failure or
/// non-2xx response is a [`DeliveryError`]; the Bot API's error payloads
/// are logged but not interpreted.
///
/// # Type Parameters
///
/// * `H` - The [`HttpClient`] implementation
#[derive(Debug, Clone)]
pub struct TelegramNotifier<H> {
    client: H,
    endpoint: Url,
}

/// Request body for the `sendMessage` call.
#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
}

impl<H> TelegramNotifier<H> {
    /// Creates a notifier for the given API base and bot token.
    ///
    /// The default API base is `https://api.telegram.org`; a custom base
    /// supports self-hosted Bot API servers and tests.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Endpoint`] if the base URL cannot carry
    /// path segments (e.g. a non-hierarchical URL).
    pub fn new(client: H, api_base: &Url, token: &str) -> Result<Self, DeliveryError> {
        // Bot tokens contain ':', which `Url::join` would parse as a scheme
        // separator; the path must be extended segment-wise.
        let mut endpoint = api_base.clone();
        endpoint
            .path_segments_mut()
            .map_err(|()| DeliveryError::Endpoint(format!("cannot append a path to '{api_base}'")))?
            .pop_if_empty()
            .push(&format!("bot{token}"))
            .push("sendMessage");

        Ok(Self { client, endpoint })
    }

    /// Returns the resolved `sendMessage` endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[cfg(test)]
#[path = "telegram_tests.rs"]
mod tests;

impl<H: HttpClient> Notifier for TelegramNotifier<H> {
    async fn deliver(&self, subscriber: SubscriberId, text: &str) -> Result<(), DeliveryError> {
        let body = serde_json::to_vec(&SendMessage {
            chat_id: subscriber.value(),
            text,
        })
        .map_err(|e| DeliveryError::Endpoint(e.to_string()))?;

        let request = HttpRequest::post(self.endpoint.clone())
            .with_header(
                ::http::header::CONTENT_TYPE,
                ::http::HeaderValue::from_static("application/json"),
            )
            .with_body(body);

        let response = self.client.request(request).await?;

        if response.is_success() {
            return Ok(());
        }

        Err(DeliveryError::Rejected {
            status: response.status,
            body: response.body_text().map(ToString::to_string),
        })
    }
}
