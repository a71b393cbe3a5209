//! SQLite-backed key-value store.
//!
//! All scopes share the `kv_entries` table; each store instance only sees
//! rows of its own scope.

use std::sync::Arc;

use rusqlite::{params, OptionalExtension};

use super::{KeyValueStore, StorageScope};
use crate::database::connection::Database;
use crate::types::errors::StorageError;

/// Store bound to one scope of a shared [`Database`].
pub struct SqliteStore {
    db: Arc<Database>,
    scope: StorageScope,
}

impl SqliteStore {
    /// Persistent store.
    pub fn local(db: Arc<Database>) -> Self {
        Self {
            db,
            scope: StorageScope::Local,
        }
    }

    /// Per-process store. Rows left over from a previous process are purged.
    pub fn session(db: Arc<Database>) -> Result<Self, StorageError> {
        let store = Self {
            db,
            scope: StorageScope::Session,
        };
        store.clear()?;
        Ok(store)
    }

    pub fn scope(&self) -> StorageScope {
        self.scope
    }
}

impl KeyValueStore for SqliteStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.db.connection()?;
        let value = conn
            .query_row(
                "SELECT value FROM kv_entries WHERE scope = ?1 AND key = ?2",
                params![self.scope.as_str(), key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self.db.connection()?;
        conn.execute(
            "INSERT INTO kv_entries (scope, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(scope, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![self.scope.as_str(), key, value, chrono::Utc::now().timestamp_millis()],
        )?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let conn = self.db.connection()?;
        conn.execute(
            "DELETE FROM kv_entries WHERE scope = ?1 AND key = ?2",
            params![self.scope.as_str(), key],
        )?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let conn = self.db.connection()?;
        let mut stmt =
            conn.prepare("SELECT key FROM kv_entries WHERE scope = ?1 ORDER BY key ASC")?;
        let rows = stmt.query_map(params![self.scope.as_str()], |row| row.get(0))?;

        let mut keys = Vec::new();
        for row in rows {
            keys.push(row?);
        }
        Ok(keys)
    }

    fn clear(&self) -> Result<(), StorageError> {
        let conn = self.db.connection()?;
        conn.execute(
            "DELETE FROM kv_entries WHERE scope = ?1",
            params![self.scope.as_str()],
        )?;
        Ok(())
    }
}
