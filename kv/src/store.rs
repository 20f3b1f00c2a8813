//! Core KvStore implementation

use eyre::{Context, Result};
use fs2::FileExt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Check that a key is usable as a file name inside the store
///
/// Keys are ASCII letters, digits, `-`, `_` and `.`, must not start with a
/// dot (reserved for store internals) and are at most [`crate::MAX_KEY_LEN`]
/// bytes long.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(eyre::eyre!("Key must not be empty"));
    }
    if key.len() > crate::MAX_KEY_LEN {
        return Err(eyre::eyre!("Key too long ({} > {} bytes)", key.len(), crate::MAX_KEY_LEN));
    }
    if key.starts_with('.') {
        return Err(eyre::eyre!("Key must not start with '.': {}", key));
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(eyre::eyre!("Key contains invalid characters: {}", key));
    }
    Ok(())
}

/// The key-value store
#[derive(Debug, Clone)]
pub struct KvStore {
    /// Base path for storage
    base_path: PathBuf,
}

impl KvStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).context("Failed to create store directory")?;
        debug!(?base_path, "Opened kv store");
        Ok(Self { base_path })
    }

    /// Directory backing this store
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    /// Read the value stored under `key`, or `None` if the key is absent
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        let path = self.base_path.join(key);
        match fs::read_to_string(&path) {
            Ok(value) => {
                debug!(key, bytes = value.len(), "get: hit");
                Ok(Some(value))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(key, "get: miss");
                Ok(None)
            }
            Err(e) => Err(e).context(format!("Failed to read key: {}", key)),
        }
    }

    /// Replace the value stored under `key`
    ///
    /// The new value is written to a temp file and renamed over the old one
    /// while holding the store's exclusive lock.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        let lock = self.lock()?;

        let tmp_path = self.base_path.join(format!(".{}.tmp", key));
        let mut tmp = fs::File::create(&tmp_path).context("Failed to create temp file")?;
        tmp.write_all(value.as_bytes())?;
        tmp.sync_all()?;
        drop(tmp);

        fs::rename(&tmp_path, self.base_path.join(key)).context(format!("Failed to replace key: {}", key))?;
        lock.unlock()?;

        debug!(key, bytes = value.len(), "set: written");
        Ok(())
    }

    /// Remove `key`; removing an absent key is not an error
    pub fn remove(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        let lock = self.lock()?;
        let removed = match fs::remove_file(self.base_path.join(key)) {
            Ok(()) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => return Err(e).context(format!("Failed to remove key: {}", key)),
        };
        lock.unlock()?;

        if removed {
            info!(key, "Removed key");
        }
        Ok(removed)
    }

    /// List all keys, sorted
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();

        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            if entry.path().is_file()
                && let Some(name) = entry.file_name().to_str()
                && !name.starts_with('.')
            {
                keys.push(name.to_string());
            }
        }

        keys.sort();
        Ok(keys)
    }

    fn lock(&self) -> Result<fs::File> {
        let file = fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.base_path.join(crate::LOCK_FILE))
            .context("Failed to open lock file")?;
        file.lock_exclusive().context("Failed to lock store")?;
        Ok(file)
    }
}
