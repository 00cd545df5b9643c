//! In-process key-value store.
//!
//! Used by tests and ephemeral sessions. A byte quota and an outage switch
//! let callers exercise the degraded persistence paths.

use super::{KeyValueStore, StorageError, StorageResult};
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared on/off switch that takes a [`MemoryKeyValueStore`] offline.
///
/// Handles stay connected to the store after it has been moved into a
/// `TaskStore`.
#[derive(Debug, Clone, Default)]
pub struct OutageSwitch {
    active: Rc<Cell<bool>>,
}

impl OutageSwitch {
    pub fn set(&self, active: bool) {
        self.active.set(active);
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: HashMap<String, String>,
    quota_bytes: Option<usize>,
    outage: OutageSwitch,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects writes pushing total value bytes above `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::default()
        }
    }

    /// Toggles simulated unavailability for both reads and writes.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.outage.set(unavailable);
    }

    /// Handle that toggles availability of this store and its clones.
    pub fn outage_switch(&self) -> OutageSwitch {
        self.outage.clone()
    }

    /// Raw write that bypasses quota/availability checks.
    pub fn insert_raw(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Raw read that bypasses availability checks.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    fn used_bytes_excluding(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(existing, _)| existing.as_str() != key)
            .map(|(existing, value)| existing.len() + value.len())
            .sum()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        if self.outage.is_active() {
            return Err(StorageError::Unavailable("memory store offline".to_string()));
        }
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        if self.outage.is_active() {
            return Err(StorageError::Unavailable("memory store offline".to_string()));
        }
        if let Some(limit) = self.quota_bytes {
            let needed = self.used_bytes_excluding(key) + key.len() + value.len();
            if needed > limit {
                return Err(StorageError::QuotaExceeded {
                    needed,
                    limit: Some(limit),
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
