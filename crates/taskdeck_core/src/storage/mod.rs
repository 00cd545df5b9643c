//! Persistence boundary for the task collection.
//!
//! # Responsibility
//! - Define the string-keyed store contract (`KeyValueStore`).
//! - Provide SQLite-backed and in-memory store implementations.
//! - Encode/decode the whole task collection under one fixed key.
//!
//! # Invariants
//! - `set` replaces the previous value in one step; partial writes are never
//!   observable through `get`.
//! - Store failures are reported as `StorageError`, never as panics.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory_kv;
pub mod sqlite_kv;
pub mod task_storage;

pub use memory_kv::{MemoryKeyValueStore, OutageSwitch};
pub use sqlite_kv::SqliteKeyValueStore;
pub use task_storage::{LoadError, TaskStorage, DEFAULT_STORAGE_KEY};

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure of the underlying key-value medium.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Medium cannot be read or written right now.
    Unavailable(String),
    /// Write rejected because the medium is full.
    QuotaExceeded {
        /// Bytes the rejected write needed.
        needed: usize,
        /// Configured limit in bytes, when known.
        limit: Option<usize>,
    },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "storage unavailable: {reason}"),
            Self::QuotaExceeded {
                needed,
                limit: Some(limit),
            } => write!(
                f,
                "storage quota exceeded: write needs {needed} bytes, limit is {limit}"
            ),
            Self::QuotaExceeded { needed, limit: None } => {
                write!(f, "storage quota exceeded: write needs {needed} bytes")
            }
        }
    }
}

impl Error for StorageError {}

/// Synchronous string-keyed store.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, or `None` when absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }
}
