//! Tests for the polling loop.

use super::*;
use crate::monitor::NoopHandler;
use crate::source::FetchError;
use crate::transport::HttpError;
use std::sync::{Arc, Mutex};

struct MockSource {
    results: Mutex<std::collections::VecDeque<Result<String, FetchError>>>,
}

impl MockSource {
    fn new(results: Vec<Result<String, FetchError>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
        }
    }

    fn returning_text(texts: Vec<&str>) -> Self {
        Self::new(texts.into_iter().map(|t| Ok(t.to_string())).collect())
    }
}

impl TaskSource for MockSource {
    async fn fetch_text(&self) -> Result<String, FetchError> {
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }
}

/// Records every list the loop reports.
#[derive(Clone, Default)]
struct RecordingHandler {
    seen: Arc<Mutex<Vec<TaskList>>>,
}

impl RecordingHandler {
    fn seen(&self) -> Vec<TaskList> {
        self.seen.lock().unwrap().clone()
    }
}

impl ChangeHandler for RecordingHandler {
    type Error = std::convert::Infallible;

    async fn on_change(&mut self, tasks: TaskList) -> Result<(), Self::Error> {
        self.seen.lock().unwrap().push(tasks);
        Ok(())
    }
}

/// Fails every invocation, for isolation tests.
struct FailingHandler;

impl ChangeHandler for FailingHandler {
    type Error = std::io::Error;

    async fn on_change(&mut self, _tasks: TaskList) -> Result<(), Self::Error> {
        Err(std::io::Error::other("handler exploded"))
    }
}

fn interval() -> std::time::Duration {
    std::time::Duration::from_secs(60)
}

mod cycles {
    use super::*;

    #[tokio::test]
    async fn first_observation_seeds_without_notifying() {
        let mut poller = PollingLoop::new(MockSource::returning_text(vec!["a\nb\n"]), interval());
        let mut handler = RecordingHandler::default();

        poller.run_cycle(&mut handler).await;

        assert!(handler.seen().is_empty());
        assert_eq!(poller.last, Some(TaskList::normalize("a\nb")));
    }

    #[tokio::test]
    async fn content_change_invokes_handler_with_new_list() {
        let mut poller =
            PollingLoop::new(MockSource::returning_text(vec!["a\n", "a\nb\n"]), interval());
        let mut handler = RecordingHandler::default();

        poller.run_cycle(&mut handler).await;
        poller.run_cycle(&mut handler).await;

        assert_eq!(handler.seen(), vec![TaskList::normalize("a\nb")]);
    }

    #[tokio::test]
    async fn identical_content_does_not_invoke_handler() {
        let mut poller =
            PollingLoop::new(MockSource::returning_text(vec!["a\n", "a\n", "a\n"]), interval());
        let mut handler = RecordingHandler::default();

        poller.run_cycle(&mut handler).await;
        poller.run_cycle(&mut handler).await;
        poller.run_cycle(&mut handler).await;

        assert!(handler.seen().is_empty());
    }

    #[tokio::test]
    async fn same_length_different_content_is_a_change() {
        let mut poller =
            PollingLoop::new(MockSource::returning_text(vec!["a\nb\n", "a\nc\n"]), interval());
        let mut handler = RecordingHandler::default();

        poller.run_cycle(&mut handler).await;
        poller.run_cycle(&mut handler).await;

        assert_eq!(handler.seen(), vec![TaskList::normalize("a\nc")]);
    }

    #[tokio::test]
    async fn fetch_failure_leaves_state_untouched() {
        let mut poller = PollingLoop::new(
            MockSource::new(vec![
                Ok("a\n".to_string()),
                Err(FetchError::Http(HttpError::Timeout)),
                Ok("a\n".to_string()),
            ]),
            interval(),
        );
        let mut handler = RecordingHandler::default();

        poller.run_cycle(&mut handler).await;
        poller.run_cycle(&mut handler).await; // fails, state stays ["a"]
        poller.run_cycle(&mut handler).await; // same content, no change

        assert!(handler.seen().is_empty());
        assert_eq!(poller.last, Some(TaskList::normalize("a")));
    }

    #[tokio::test]
    async fn handler_failure_is_swallowed_and_state_still_advances() {
        let mut poller =
            PollingLoop::new(MockSource::returning_text(vec!["a\n", "b\n"]), interval());
        let mut handler = FailingHandler;

        poller.run_cycle(&mut handler).await;
        poller.run_cycle(&mut handler).await;

        // Despite the handler error, the new list was stored.
        assert_eq!(poller.last, Some(TaskList::normalize("b")));
    }
}

mod stopping {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn stop_before_run_exits_immediately() {
        let poller = PollingLoop::new(MockSource::returning_text(vec![]), interval());
        let handle = poller.stop_handle();

        handle.stop();
        assert!(handle.is_stopped());

        // Must return without waiting out any interval.
        tokio::time::timeout(Duration::from_millis(1), poller.run(NoopHandler))
            .await
            .expect("loop did not observe the stop request");
    }

    #[tokio::test(start_paused = true)]
    async fn stop_wakes_the_inter_cycle_sleep() {
        let poller = PollingLoop::new(MockSource::returning_text(vec!["a\n"]), interval());
        let handle = poller.stop_handle();

        let task = tokio::spawn(poller.run(NoopHandler));

        // Let the first cycle run, then stop mid-sleep.
        tokio::time::sleep(Duration::from_secs(1)).await;
        handle.stop();

        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("loop did not stop")
            .unwrap();
    }

    #[tokio::test]
    async fn stop_is_idempotent() {
        let poller = PollingLoop::new(MockSource::returning_text(vec![]), interval());
        let handle = poller.stop_handle();

        handle.stop();
        handle.stop();
        assert!(handle.is_stopped());
    }
}
