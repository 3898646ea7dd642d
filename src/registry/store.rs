//! File-based subscriber persistence.
//!
//! The on-disk format is a bare JSON array of signed integers in sorted
//! order, e.g. `[-100123, 42, 77]`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::SubscriberSet;

/// Result of loading the subscriber set from persistent storage.
///
/// Explicitly models all valid states to avoid ambiguity:
/// - Successfully loaded a previous set
/// - No previous set exists (first run)
/// - A file exists but is corrupted/unreadable
#[derive(Debug, Clone)]
pub enum LoadResult {
    /// Successfully loaded a previously saved set.
    Loaded(SubscriberSet),

    /// No registry file exists (first run or explicitly deleted).
    NotFound,

    /// Registry file exists but could not be read or parsed.
    /// Callers should continue with an empty set and overwrite on next save.
    Corrupted {
        /// Reason for corruption (for logging/debugging).
        reason: String,
    },
}

impl LoadResult {
    /// Returns the loaded set, or an empty set for `NotFound`/`Corrupted`.
    #[must_use]
    pub fn into_set(self) -> SubscriberSet {
        match self {
            Self::Loaded(set) => set,
            Self::NotFound | Self::Corrupted { .. } => SubscriberSet::new(),
        }
    }

    /// Returns `true` if a set was successfully loaded.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// Errors that can occur while persisting the subscriber set.
///
/// Only covers write-side errors; read-side issues are modeled as
/// [`LoadResult`] variants to allow graceful degradation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to write the registry file.
    #[error("Failed to write registry file: {0}")]
    Write(#[source] std::io::Error),

    /// Failed to serialize the set to JSON.
    #[error("Failed to serialize registry: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Abstraction for persisting the subscriber set between runs.
///
/// Implementations should:
/// - Use atomic writes so a crash mid-write leaves either old or new content
/// - Handle missing files gracefully (return `LoadResult::NotFound`)
/// - Degrade gracefully on read errors (return `LoadResult::Corrupted`)
///
/// # Testing
///
/// Use [`mock::MockRegistryStore`] in tests to avoid filesystem dependencies.
pub trait RegistryStore: Send + Sync {
    /// Loads the previously saved subscriber set.
    fn load(&self) -> LoadResult;

    /// Saves the full subscriber set.
    ///
    /// # Errors
    ///
    /// Returns an error if the set cannot be written. A write failure does
    /// not roll back in-memory state; callers log and continue.
    fn save(
        &self,
        set: &SubscriberSet,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}

/// File-based implementation of [`RegistryStore`].
///
/// # Atomic Writes
///
/// Uses the write-to-temp-then-rename pattern:
/// 1. Write to `{path}.tmp`
/// 2. Rename `{path}.tmp` to `{path}`
///
/// This ensures the file is either fully written or not written at all.
#[derive(Debug, Clone)]
pub struct FileRegistryStore {
    path: PathBuf,
}

impl FileRegistryStore {
    /// Creates a new file-based registry store at the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the registry file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Performs the blocking save operation.
    ///
    /// Separated out so it can be wrapped in `spawn_blocking`.
    fn save_blocking(path: &Path, set: &SubscriberSet) -> Result<(), StoreError> {
        // BTreeSet serializes in sorted order, keeping the file deterministic.
        let content = serde_json::to_string(set).map_err(StoreError::Serialize)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(StoreError::Write)?;
            }
        }

        // Append .tmp instead of replacing extension to avoid conflicts
        // (e.g., subscribers.json -> subscribers.json.tmp)
        let temp_path = PathBuf::from(format!("{}.tmp", path.display()));

        std::fs::write(&temp_path, content).map_err(StoreError::Write)?;

        // Atomic rename (on most filesystems)
        std::fs::rename(&temp_path, path).map_err(StoreError::Write)?;

        Ok(())
    }
}

impl RegistryStore for FileRegistryStore {
    fn load(&self) -> LoadResult {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return LoadResult::NotFound,
            Err(e) => {
                return LoadResult::Corrupted {
                    reason: format!("Failed to read file: {e}"),
                };
            }
        };

        match serde_json::from_str::<SubscriberSet>(&content) {
            Ok(set) => LoadResult::Loaded(set),
            Err(e) => LoadResult::Corrupted {
                reason: format!("Invalid JSON: {e}"),
            },
        }
    }

    async fn save(&self, set: &SubscriberSet) -> Result<(), StoreError> {
        let path = self.path.clone();
        let set = set.clone();

        // Use spawn_blocking to avoid blocking the async runtime
        tokio::task::spawn_blocking(move || Self::save_blocking(&path, &set))
            .await
            .expect("spawn_blocking task panicked")
    }
}
