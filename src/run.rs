//! Application execution logic.
//!
//! This module dispatches the parsed command: the broadcast daemon,
//! the plain watch loop, one-shot task listing, and registry edits.

use thiserror::Error;
use tokio::signal;
use tokio_stream::{StreamExt, wrappers::IntervalStream};

use taskwatch::broadcast::Broadcaster;
use taskwatch::config::{Command, ValidatedConfig, write_default_config};
use taskwatch::monitor::{ChangeHandler, PollingLoop};
use taskwatch::notify::{DeliveryError, MessageComposer, TelegramNotifier};
use taskwatch::registry::{
    FileRegistryStore, LoadResult, RegistryStore, StoreError, SubscriberId, SubscriberSet,
};
use taskwatch::source::{FetchError, HttpTaskSource, TaskSource};
use taskwatch::tasks::TaskList;
use taskwatch::transport::ReqwestClient;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The broadcast daemon needs a bot token.
    #[error("Missing bot token. Use --token or set notify.token in config file")]
    MissingToken,

    /// The API base and token do not form a valid delivery endpoint.
    #[error("Failed to build delivery endpoint: {0}")]
    Endpoint(#[source] DeliveryError),

    /// A one-shot fetch failed.
    #[error("Failed to fetch task list: {0}")]
    Fetch(#[source] FetchError),

    /// A registry edit could not be persisted.
    #[error("Failed to save registry: {0}")]
    RegistrySave(#[source] StoreError),

    /// Writing the configuration template failed.
    #[error(transparent)]
    Config(#[from] taskwatch::config::ConfigError),
}

/// Executes the selected command.
///
/// `None` runs the broadcast daemon until a shutdown signal.
///
/// # Errors
///
/// Returns an error if:
/// - The broadcast daemon is started without a bot token
/// - The delivery endpoint cannot be built from the API base and token
/// - A one-shot fetch or registry edit fails
///
/// # Coverage Note
///
/// Excluded from coverage because it requires a real async runtime with
/// signal handling; the per-command helpers carry the testable logic.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig, command: Option<Command>) -> Result<(), RunError> {
    match command {
        None => run_broadcast(config).await,
        Some(Command::Watch) => run_watch(config).await,
        Some(Command::Tasks) => run_tasks(config).await,
        Some(Command::Subscribe { id }) => run_subscription_edit(&config, id, true).await,
        Some(Command::Unsubscribe { id }) => run_subscription_edit(&config, id, false).await,
        // Normally handled before config load; kept total for direct callers.
        Some(Command::Init { output }) => {
            write_default_config(&output)?;
            println!("Configuration template written to: {}", output.display());
            Ok(())
        }
    }
}

/// Runs the broadcast daemon: poll, detect changes, notify subscribers.
///
/// Excluded from coverage - requires signal handling.
#[cfg(not(tarpaulin_include))]
async fn run_broadcast(config: ValidatedConfig) -> Result<(), RunError> {
    let token = resolve_token(&config)?;

    let client = ReqwestClient::new();
    let source = HttpTaskSource::new(client.clone(), config.url.clone())
        .with_timeout(config.fetch_timeout);
    let notifier =
        TelegramNotifier::new(client, &config.api_base, token).map_err(RunError::Endpoint)?;

    let store = FileRegistryStore::new(&config.registry_file);
    tracing::info!("Registry file: {}", store.path().display());
    let subscribers = load_registry(&store);

    if config.dry_run {
        tracing::info!("Dry-run mode enabled - notices will be logged but not delivered");
    }

    let mut broadcaster = Broadcaster::new(source, notifier, store, subscribers)
        .with_composer(composer_from(&config))
        .with_dry_run(config.dry_run);

    tracing::info!(
        "Broadcast daemon started (interval: {}s)",
        config.poll_interval.as_secs()
    );

    let mut ticker = IntervalStream::new(tokio::time::interval(config.poll_interval));
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            () = &mut shutdown => {
                tracing::info!("Shutdown signal received, stopping...");
                return Ok(());
            }

            _ = ticker.next() => {
                broadcaster.run_cycle().await;
            }
        }
    }
}

/// Runs the plain polling loop, printing changes without notifying anyone.
///
/// Excluded from coverage - requires signal handling.
#[cfg(not(tarpaulin_include))]
async fn run_watch(config: ValidatedConfig) -> Result<(), RunError> {
    let client = ReqwestClient::new();
    let source = HttpTaskSource::new(client, config.url.clone()).with_timeout(config.fetch_timeout);

    let poller = PollingLoop::new(source, config.poll_interval);
    let handle = poller.stop_handle();

    tracing::info!(
        "Watching {} (interval: {}s)",
        config.url,
        config.poll_interval.as_secs()
    );

    let task = tokio::spawn(poller.run(PrintHandler));

    shutdown_signal().await;
    tracing::info!("Shutdown signal received, stopping...");
    handle.stop();

    // The loop finishes its in-flight cycle before observing the stop.
    let _ = task.await;
    Ok(())
}

/// Fetches the task list once and prints it.
async fn run_tasks(config: ValidatedConfig) -> Result<(), RunError> {
    let client = ReqwestClient::new();
    let source = HttpTaskSource::new(client, config.url.clone()).with_timeout(config.fetch_timeout);

    let raw = source.fetch_text().await.map_err(RunError::Fetch)?;
    let tasks = TaskList::normalize(&raw);

    println!("{}", render_tasks(&tasks));
    Ok(())
}

/// Adds or removes a subscriber and reports the outcome.
async fn run_subscription_edit(
    config: &ValidatedConfig,
    id: SubscriberId,
    subscribe: bool,
) -> Result<(), RunError> {
    let store = FileRegistryStore::new(&config.registry_file);
    let change = apply_subscription(&store, id, subscribe).await?;

    match change {
        SubscriptionChange::Added => println!("Subscribed {id}"),
        SubscriptionChange::AlreadySubscribed => println!("{id} is already subscribed"),
        SubscriptionChange::Removed => println!("Unsubscribed {id}"),
        SubscriptionChange::NotSubscribed => println!("{id} was not subscribed"),
    }

    Ok(())
}

/// Outcome of a registry edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubscriptionChange {
    Added,
    AlreadySubscribed,
    Removed,
    NotSubscribed,
}

/// Loads, mutates, and persists the subscriber set.
///
/// The set is only written back when the edit actually changed it.
async fn apply_subscription<R: RegistryStore>(
    store: &R,
    id: SubscriberId,
    subscribe: bool,
) -> Result<SubscriptionChange, RunError> {
    let mut set = load_registry(store);

    let change = if subscribe {
        if set.subscribe(id) {
            SubscriptionChange::Added
        } else {
            SubscriptionChange::AlreadySubscribed
        }
    } else if set.unsubscribe(id) {
        SubscriptionChange::Removed
    } else {
        SubscriptionChange::NotSubscribed
    };

    if matches!(
        change,
        SubscriptionChange::Added | SubscriptionChange::Removed
    ) {
        store.save(&set).await.map_err(RunError::RegistrySave)?;
    }

    Ok(change)
}

/// Resolves the bot token for the broadcast daemon.
///
/// Dry-run never delivers anything, so it may run without credentials;
/// a real run without a token is refused.
fn resolve_token(config: &ValidatedConfig) -> Result<&str, RunError> {
    match config.token.as_deref() {
        Some(token) => Ok(token),
        None if config.dry_run => Ok(""),
        None => Err(RunError::MissingToken),
    }
}

/// Loads the subscriber set, degrading gracefully on read problems.
fn load_registry(store: &impl RegistryStore) -> SubscriberSet {
    match store.load() {
        LoadResult::Loaded(set) => {
            tracing::info!("Loaded {} subscriber(s)", set.len());
            set
        }
        LoadResult::NotFound => {
            tracing::info!("No registry file found, starting with an empty set");
            SubscriberSet::new()
        }
        LoadResult::Corrupted { reason } => {
            tracing::warn!("Registry file corrupted ({reason}), will overwrite on next save");
            SubscriberSet::new()
        }
    }
}

/// Builds the notice composer from configuration.
fn composer_from(config: &ValidatedConfig) -> MessageComposer {
    config.message_template.as_ref().map_or_else(
        MessageComposer::new,
        |template| MessageComposer::new().with_template(template),
    )
}

/// Renders a task list for terminal output.
fn render_tasks(tasks: &TaskList) -> String {
    if tasks.is_empty() {
        "No tasks.".to_string()
    } else {
        tasks.to_string()
    }
}

/// Change handler for the watch command: prints the new list.
struct PrintHandler;

impl ChangeHandler for PrintHandler {
    type Error = std::convert::Infallible;

    async fn on_change(&mut self, tasks: TaskList) -> Result<(), Self::Error> {
        println!("Task list changed:\n{}", render_tasks(&tasks));
        Ok(())
    }
}

/// Returns a future that completes when a shutdown signal is received.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
