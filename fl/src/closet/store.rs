//! Persistent closet store
//!
//! The whole closet lives under one key as a JSON array. It is read once at
//! startup and rewritten in full after every mutation.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::{debug, warn};

use super::ClosetError;
use crate::domain::SavedOutfit;

/// Opaque key-value storage the closet is persisted into
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> eyre::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> eyre::Result<()>;
}

impl KeyValueStore for kvstore::KvStore {
    fn get(&self, key: &str) -> eyre::Result<Option<String>> {
        kvstore::KvStore::get(self, key)
    }

    fn set(&self, key: &str, value: &str) -> eyre::Result<()> {
        kvstore::KvStore::set(self, key, value)
    }
}

/// In-memory store for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> eyre::Result<Option<String>> {
        let values = self.values.lock().map_err(|_| eyre::eyre!("memory store poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> eyre::Result<()> {
        let mut values = self.values.lock().map_err(|_| eyre::eyre!("memory store poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Loads and saves the closet blob
pub struct ClosetStore {
    backend: Box<dyn KeyValueStore>,
    key: String,
}

impl ClosetStore {
    pub fn new(backend: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the saved closet
    ///
    /// Absent or malformed data loads as an empty closet; only a failing
    /// backend is an error.
    pub fn load(&self) -> Result<Vec<SavedOutfit>, ClosetError> {
        let Some(blob) = self.backend.get(&self.key).map_err(ClosetError::Store)? else {
            debug!(key = %self.key, "load: no closet stored");
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<SavedOutfit>>(&blob) {
            Ok(closet) => {
                debug!(key = %self.key, count = closet.len(), "load: closet loaded");
                Ok(closet)
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "load: malformed closet data, starting empty");
                Ok(Vec::new())
            }
        }
    }

    /// Replace the stored closet with `closet`
    pub fn save(&self, closet: &[SavedOutfit]) -> Result<(), ClosetError> {
        let blob = serde_json::to_string(closet)?;
        self.backend.set(&self.key, &blob).map_err(ClosetError::Store)?;
        debug!(key = %self.key, count = closet.len(), "save: closet written");
        Ok(())
    }
}
