//! SQLite-backed key-value store.
//!
//! # Responsibility
//! - Persist string values in the `kv_store` table.
//! - Map SQLite failures onto `StorageError` kinds.
//!
//! # Invariants
//! - Writes are a single upsert statement, so a value is either fully
//!   replaced or left untouched.
//! - The connection must be migrated before a store is created.

use super::{KeyValueStore, StorageError, StorageResult};
use crate::db::migrations::{current_user_version, latest_version};
use crate::db::{DbError, DbResult};
use log::error;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

/// Key-value store over a borrowed, migrated SQLite connection.
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    /// Creates a store after checking the schema is fully migrated.
    ///
    /// # Errors
    /// - `UnsupportedSchemaVersion` when the schema is older or newer than
    ///   this binary expects.
    pub fn try_new(conn: &'conn Connection) -> DbResult<Self> {
        let version = current_user_version(conn)?;
        let latest = latest_version();
        if version != latest {
            return Err(DbError::UnsupportedSchemaVersion {
                db_version: version,
                latest_supported: latest,
            });
        }
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|err| {
                error!(
                    "event=kv_get module=storage status=error key={} error={}",
                    key, err
                );
                map_sqlite_error(err, 0)
            })
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.conn
            .execute(
                "INSERT INTO kv_store (key, value, updated_at)
                 VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at;",
                params![key, value],
            )
            .map(|_| ())
            .map_err(|err| {
                error!(
                    "event=kv_set module=storage status=error key={} bytes={} error={}",
                    key,
                    value.len(),
                    err
                );
                map_sqlite_error(err, value.len())
            })
    }
}

fn map_sqlite_error(err: rusqlite::Error, needed: usize) -> StorageError {
    match err.sqlite_error_code() {
        Some(ErrorCode::DiskFull) => StorageError::QuotaExceeded {
            needed,
            limit: None,
        },
        _ => StorageError::Unavailable(err.to_string()),
    }
}
