//! Save/load persistence
//!
//! Documents are stored as JSON strings under fixed keys in a small
//! key/value store. The browser build uses LocalStorage; tests and the
//! native demo use an in-memory map.

#[cfg(target_arch = "wasm32")]
pub mod local_storage;

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorage;

/// Failure talking to a storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,

    #[error("storage backend rejected the request: {0}")]
    Backend(String),

    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Minimal string key/value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Volatile store backed by a `HashMap`
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Read and decode the document stored under `key`
pub fn load_json<T: DeserializeOwned>(
    store: &impl KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Encode `value` and store it under `key`
pub fn save_json<T: Serialize>(
    store: &mut impl KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

/// Load a document, falling back to `T::default()` when it is missing or
/// unreadable
pub fn load_or_default<T: DeserializeOwned + Default>(store: &impl KeyValueStore, key: &str) -> T {
    match load_json(store, key) {
        Ok(Some(value)) => {
            log::info!("Loaded {} from storage", key);
            value
        }
        Ok(None) => {
            log::info!("No {} found, starting fresh", key);
            T::default()
        }
        Err(e) => {
            log::warn!("Could not load {}: {}", key, e);
            T::default()
        }
    }
}

/// Save a document, logging instead of failing
pub fn save_or_warn<T: Serialize>(store: &mut impl KeyValueStore, key: &str, value: &T) -> bool {
    match save_json(store, key, value) {
        Ok(()) => {
            log::info!("Saved {}", key);
            true
        }
        Err(e) => {
            log::warn!("Could not save {}: {}", key, e);
            false
        }
    }
}
