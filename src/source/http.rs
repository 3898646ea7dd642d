//! HTTP implementation of the task source.

use std::time::Duration;

use url::Url;

use crate::transport::{HttpClient, HttpRequest};

use super::{FetchError, TaskSource};

/// Fetches the task list from a URL via HTTP GET.
///
/// Every fetch is bounded by the configured timeout so a hung server
/// cannot wedge the polling loop.
///
/// # Type Parameters
///
/// * `H` - The [`HttpClient`] implementation
#[derive(Debug, Clone)]
pub struct HttpTaskSource<H> {
    client: H,
    url: Url,
    timeout: Duration,
}

impl<H> HttpTaskSource<H> {
    /// Default fetch timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a new HTTP task source with the default timeout.
    #[must_use]
    pub const fn new(client: H, url: Url) -> Self {
        Self {
            client,
            url,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets the fetch timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the configured URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the configured timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;

impl<H: HttpClient> TaskSource for HttpTaskSource<H> {
    async fn fetch_text(&self) -> Result<String, FetchError> {
        let request = HttpRequest::get(self.url.clone()).with_timeout(self.timeout);

        let response = self.client.request(request).await?;

        if !response.is_success() {
            return Err(FetchError::Status {
                status: response.status,
            });
        }

        String::from_utf8(response.body).map_err(|e| FetchError::NotText {
            reason: e.to_string(),
        })
    }
}
