//! Tests for the HTTP task source.

use super::*;
use crate::transport::{HttpClient, HttpError, HttpRequest, HttpResponse};
use std::sync::Mutex;
use std::time::Duration;

/// A mock client that records requests and replays canned results.
///
/// Uses `Mutex<VecDeque>` to avoid requiring `Clone` on `HttpError`.
struct MockClient {
    results: Mutex<std::collections::VecDeque<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockClient {
    fn new(results: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn returning_text(status: http::StatusCode, body: &[u8]) -> Self {
        Self::new(vec![Ok(HttpResponse::new(
            status,
            http::HeaderMap::new(),
            body.to_vec(),
        ))])
    }

    fn last_request(&self) -> HttpRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requests.lock().unwrap().push(req);
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(HttpError::Timeout))
    }
}

fn source_url() -> url::Url {
    url::Url::parse("https://example.com/tasks.txt").unwrap()
}

#[tokio::test]
async fn returns_body_text_on_success() {
    let client = MockClient::returning_text(http::StatusCode::OK, b"a\nb\n");
    let source = HttpTaskSource::new(client, source_url());

    let text = source.fetch_text().await.unwrap();

    assert_eq!(text, "a\nb\n");
}

#[tokio::test]
async fn sends_get_with_configured_timeout() {
    let client = MockClient::returning_text(http::StatusCode::OK, b"");
    let source =
        HttpTaskSource::new(client, source_url()).with_timeout(Duration::from_secs(10));

    let _ = source.fetch_text().await;

    let req = source.client.last_request();
    assert_eq!(req.method, http::Method::GET);
    assert_eq!(req.url, source_url());
    assert_eq!(req.timeout, Some(Duration::from_secs(10)));
}

#[tokio::test]
async fn default_timeout_is_thirty_seconds() {
    let client = MockClient::returning_text(http::StatusCode::OK, b"");
    let source = HttpTaskSource::new(client, source_url());

    assert_eq!(source.timeout(), Duration::from_secs(30));

    let _ = source.fetch_text().await;
    assert_eq!(
        source.client.last_request().timeout,
        Some(Duration::from_secs(30))
    );
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let client = MockClient::returning_text(http::StatusCode::NOT_FOUND, b"gone");
    let source = HttpTaskSource::new(client, source_url());

    let err = source.fetch_text().await.unwrap_err();

    assert!(matches!(
        err,
        FetchError::Status { status } if status == http::StatusCode::NOT_FOUND
    ));
}

#[tokio::test]
async fn transport_error_maps_to_fetch_error() {
    let client = MockClient::new(vec![Err(HttpError::Timeout)]);
    let source = HttpTaskSource::new(client, source_url());

    let err = source.fetch_text().await.unwrap_err();

    assert!(matches!(err, FetchError::Http(HttpError::Timeout)));
}

#[tokio::test]
async fn invalid_utf8_body_is_not_text() {
    let client = MockClient::returning_text(http::StatusCode::OK, &[0xff, 0xfe]);
    let source = HttpTaskSource::new(client, source_url());

    let err = source.fetch_text().await.unwrap_err();

    assert!(matches!(err, FetchError::NotText { .. }));
}
