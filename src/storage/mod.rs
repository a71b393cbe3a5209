//! Key-value storage backends.
//!
//! [`KeyValueStore`] mirrors the browser `localStorage`/`sessionStorage`
//! contract: string keys, string values, synchronous access. Managers receive
//! a store explicitly instead of reaching for a global, so tests can swap in
//! [`MemoryStore`] while the application uses [`SqliteStore`].

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::types::errors::StorageError;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Lifetime class of stored entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageScope {
    /// Survives restarts (the `localStorage` equivalent).
    Local,
    /// Lives for one process (the `sessionStorage` equivalent).
    Session,
}

impl StorageScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageScope::Local => "local",
            StorageScope::Session => "session",
        }
    }
}

/// Trait defining a synchronous string key-value store.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
    /// Keys in ascending order.
    fn keys(&self) -> Result<Vec<String>, StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

/// Reads and parses a JSON document. `Ok(None)` when the key is absent.
pub fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get_item(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::SerializationError(format!("{}: {}", key, e))),
        None => Ok(None),
    }
}

/// Serializes a value as JSON and stores it under `key`.
pub fn write_json<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)
        .map_err(|e| StorageError::SerializationError(format!("{}: {}", key, e)))?;
    store.set_item(key, &raw)
}
