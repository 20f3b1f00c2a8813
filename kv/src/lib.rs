//! KvStore - file-backed key-value blob store
//!
//! Stores opaque string values under short keys, one file per key. Every
//! write replaces the whole value atomically, so readers see either the old
//! blob or the new one and never a torn write.
//!
//! # Layout
//!
//! ```text
//! .kvstore/
//! ├── .lock                 # advisory lock taken around writes
//! ├── fashionLabsCloset     # one file per key, raw value bytes
//! └── ...
//! ```
//!
//! # Example
//!
//! ```ignore
//! use kvstore::KvStore;
//!
//! let store = KvStore::open(".kvstore")?;
//! store.set("greeting", "hello")?;
//! assert_eq!(store.get("greeting")?.as_deref(), Some("hello"));
//! ```

pub mod cli;
pub mod config;
mod store;

pub use store::{KvStore, validate_key};

/// Maximum key length in bytes
pub const MAX_KEY_LEN: usize = 128;

/// Name of the lock file inside the store directory
pub const LOCK_FILE: &str = ".lock";
