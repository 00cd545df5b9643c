//! Authoritative in-memory task collection.
//!
//! # Responsibility
//! - Provide create/update/delete/toggle/query entry points.
//! - Persist the full collection after every mutation.
//!
//! # Invariants
//! - This store is the only mutator of task state.
//! - Validation happens before mutation; a rejected call leaves the
//!   collection untouched.
//! - Persistence is fail-soft: a failed save keeps the in-memory mutation
//!   and flags the store as unsaved until a later save succeeds.
//! - A collection that could not be read at open is never overwritten:
//!   until a read succeeds, saves first reload it and keep its tasks.
//! - Storage order is insertion order; display ordering is left to
//!   projections.

use crate::clock::{Clock, SystemClock};
use crate::model::task::{Task, TaskId, TaskInput, TaskPatch, TaskValidationError};
use crate::storage::{KeyValueStore, LoadError, StorageError, TaskStorage};
use log::{error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by task store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Input rejected before any mutation.
    Validation(TaskValidationError),
    /// Referenced task does not exist.
    NotFound(TaskId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Whether the in-memory collection matches persisted state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceState {
    Saved,
    /// Last save failed; memory holds changes the medium does not.
    Unsaved { reason: StorageError },
}

impl PersistenceState {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }
}

/// Task collection owner.
pub struct TaskStore<S: KeyValueStore> {
    storage: TaskStorage<S>,
    tasks: Vec<Task>,
    clock: Box<dyn Clock>,
    persistence: PersistenceState,
    /// False while persisted state is unknown because the medium failed.
    loaded: bool,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Opens the store with the system clock, loading persisted tasks.
    pub fn open(storage: TaskStorage<S>) -> Self {
        Self::open_with_clock(storage, Box::new(SystemClock))
    }

    /// Opens the store with a caller-provided clock.
    ///
    /// Malformed persisted state yields an empty collection. An unreadable
    /// medium also starts empty, but in the unsaved state.
    pub fn open_with_clock(storage: TaskStorage<S>, clock: Box<dyn Clock>) -> Self {
        let (tasks, persistence, loaded) = match storage.try_load() {
            Ok(tasks) => (tasks, PersistenceState::Saved, true),
            Err(LoadError::Malformed(details)) => {
                warn!(
                    "event=tasks_load module=store status=recovered error_code=malformed_state error={}",
                    details
                );
                (Vec::new(), PersistenceState::Saved, true)
            }
            Err(LoadError::Storage(err)) => {
                error!(
                    "event=tasks_load module=store status=error mode=unsaved error_code=storage_unavailable error={}",
                    err
                );
                (Vec::new(), PersistenceState::Unsaved { reason: err }, false)
            }
        };
        Self {
            storage,
            tasks,
            clock,
            persistence,
            loaded,
        }
    }

    /// Creates and persists a task.
    ///
    /// # Errors
    /// - `Validation(EmptyTitle)` when the trimmed title is empty.
    pub fn create(&mut self, input: TaskInput) -> StoreResult<Task> {
        let task = Task::create(input, self.clock.now()).map_err(|err| {
            warn!("event=task_create module=store status=rejected error={}", err);
            err
        })?;

        self.tasks.push(task.clone());
        info!(
            "event=task_create module=store status=ok task_id={} count={}",
            task.id,
            self.tasks.len()
        );
        self.persist();
        Ok(task)
    }

    /// Merges `patch` over the task with `id` and persists.
    ///
    /// # Errors
    /// - `NotFound` when `id` is absent.
    /// - `Validation` when the merged title is empty.
    pub fn update(&mut self, id: &str, patch: TaskPatch) -> StoreResult<Task> {
        let now = self.clock.now();
        let index = self.index_of(id)?;
        let updated = self.tasks[index].patched(patch, now).map_err(|err| {
            warn!(
                "event=task_update module=store status=rejected task_id={} error={}",
                id, err
            );
            err
        })?;

        self.tasks[index] = updated.clone();
        info!("event=task_update module=store status=ok task_id={}", id);
        self.persist();
        Ok(updated)
    }

    /// Removes the task with `id`. Returns whether a task was removed.
    ///
    /// Deleting an absent id is a no-op and skips persistence.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        let removed = self.tasks.len() != before;

        info!(
            "event=task_delete module=store status=ok task_id={} removed={}",
            id, removed
        );
        if removed {
            self.persist();
        }
        removed
    }

    /// Flips completion: completed goes to pending, anything else to completed.
    ///
    /// # Errors
    /// - `NotFound` when `id` is absent.
    pub fn toggle_complete(&mut self, id: &str) -> StoreResult<Task> {
        let now = self.clock.now();
        let index = self.index_of(id)?;
        let task = &mut self.tasks[index];
        let previous = task.status;
        task.status = previous.toggled();
        task.touch(now);
        let toggled = task.clone();

        info!(
            "event=task_toggle module=store status=ok task_id={} from={} to={}",
            id, previous, toggled.status
        );
        self.persist();
        Ok(toggled)
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Full collection in insertion order.
    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn persistence(&self) -> &PersistenceState {
        &self.persistence
    }

    /// Retries persisting the current collection.
    ///
    /// Returns the storage error when the medium still rejects the write.
    pub fn flush(&mut self) -> Result<(), StorageError> {
        self.persist();
        match &self.persistence {
            PersistenceState::Saved => Ok(()),
            PersistenceState::Unsaved { reason } => Err(reason.clone()),
        }
    }

    pub fn storage(&self) -> &TaskStorage<S> {
        &self.storage
    }

    fn index_of(&self, id: &str) -> StoreResult<usize> {
        self.tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| {
                warn!("event=task_lookup module=store status=not_found task_id={}", id);
                StoreError::NotFound(id.to_string())
            })
    }

    fn persist(&mut self) {
        if !self.loaded {
            if let Err(err) = self.recover_persisted() {
                error!(
                    "event=tasks_save module=store status=error mode=unsaved stage=reload count={} error={}",
                    self.tasks.len(),
                    err
                );
                self.persistence = PersistenceState::Unsaved { reason: err };
                return;
            }
        }

        match self.storage.save(&self.tasks) {
            Ok(()) => self.persistence = PersistenceState::Saved,
            Err(err) => {
                error!(
                    "event=tasks_save module=store status=error mode=unsaved count={} error={}",
                    self.tasks.len(),
                    err
                );
                self.persistence = PersistenceState::Unsaved { reason: err };
            }
        }
    }

    /// Re-reads the collection that failed to load at open and puts its
    /// tasks ahead of those created since.
    fn recover_persisted(&mut self) -> Result<(), StorageError> {
        let persisted = match self.storage.try_load() {
            Ok(tasks) => tasks,
            Err(LoadError::Storage(err)) => return Err(err),
            Err(LoadError::Malformed(_)) => Vec::new(),
        };

        let known: HashSet<&str> = persisted.iter().map(|task| task.id.as_str()).collect();
        let created: Vec<Task> = self
            .tasks
            .iter()
            .filter(|task| !known.contains(task.id.as_str()))
            .cloned()
            .collect();
        info!(
            "event=tasks_load module=store status=recovered persisted={} pending={}",
            persisted.len(),
            created.len()
        );

        self.tasks = persisted;
        self.tasks.extend(created);
        self.loaded = true;
        Ok(())
    }
}
