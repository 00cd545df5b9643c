//! Whole-collection task persistence.
//!
//! # Responsibility
//! - Serialize the task collection as one JSON array under a fixed key.
//! - Recover from absent or unreadable state by yielding an empty collection.
//!
//! # Invariants
//! - `load` never fails the caller.
//! - A decoded collection with duplicate ids is treated as malformed.
//! - `save` writes the full collection; there is no per-task write.

use super::{KeyValueStore, StorageError, StorageResult};
use crate::model::task::Task;
use log::{info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Key under which the collection is stored unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "tasks";

/// Reasons a load could not produce the persisted collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The medium could not be read.
    Storage(StorageError),
    /// Stored content is not a valid task collection.
    Malformed(String),
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Malformed(details) => write!(f, "malformed task collection: {details}"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Malformed(_) => None,
        }
    }
}

impl From<StorageError> for LoadError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Storage adapter that reads and writes the full task collection.
pub struct TaskStorage<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> TaskStorage<S> {
    /// Adapter using [`DEFAULT_STORAGE_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Loads the collection, substituting an empty one on any failure.
    ///
    /// Failures are logged with `event=tasks_load status=recovered`.
    pub fn load(&self) -> Vec<Task> {
        match self.try_load() {
            Ok(tasks) => tasks,
            Err(err) => {
                let error_code = match err {
                    LoadError::Storage(_) => "storage_unavailable",
                    LoadError::Malformed(_) => "malformed_state",
                };
                warn!(
                    "event=tasks_load module=storage status=recovered key={} error_code={} error={}",
                    self.key, error_code, err
                );
                Vec::new()
            }
        }
    }

    /// Loads the collection and reports why it could not be read.
    ///
    /// An absent key is not an error and yields an empty collection.
    pub fn try_load(&self) -> Result<Vec<Task>, LoadError> {
        let Some(raw) = self.store.get(&self.key)? else {
            info!(
                "event=tasks_load module=storage status=ok key={} count=0 source=empty",
                self.key
            );
            return Ok(Vec::new());
        };

        let tasks = decode_tasks(&raw)?;
        info!(
            "event=tasks_load module=storage status=ok key={} count={}",
            self.key,
            tasks.len()
        );
        Ok(tasks)
    }

    /// Writes the full collection, replacing prior content.
    pub fn save(&mut self, tasks: &[Task]) -> StorageResult<()> {
        let started_at = Instant::now();
        let encoded = serde_json::to_string(tasks)
            .map_err(|err| StorageError::Unavailable(format!("encode failed: {err}")))?;

        self.store.set(&self.key, &encoded)?;
        info!(
            "event=tasks_save module=storage status=ok key={} count={} bytes={} duration_ms={}",
            self.key,
            tasks.len(),
            encoded.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

fn decode_tasks(raw: &str) -> Result<Vec<Task>, LoadError> {
    let tasks: Vec<Task> =
        serde_json::from_str(raw).map_err(|err| LoadError::Malformed(err.to_string()))?;

    let mut seen = HashSet::with_capacity(tasks.len());
    for task in &tasks {
        if !seen.insert(task.id.as_str()) {
            return Err(LoadError::Malformed(format!(
                "duplicate task id `{}`",
                task.id
            )));
        }
    }
    Ok(tasks)
}
