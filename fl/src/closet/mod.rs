//! Digital closet: saved outfits persisted to a key-value store

mod manager;
mod store;

pub use manager::{ClosetManager, NamingState, RenameState};
pub use store::{ClosetStore, KeyValueStore, MemoryStore};

use thiserror::Error;

use crate::domain::OutfitId;

/// Errors from closet operations
#[derive(Debug, Error)]
pub enum ClosetError {
    #[error("No saved outfit with id {0}")]
    NotFound(OutfitId),

    #[error("There is no outfit to save")]
    NoOutfit,

    #[error("No outfit is waiting to be named")]
    NotPrompting,

    #[error("No outfit id left above the largest saved one")]
    IdsExhausted,

    #[error("Store error: {0}")]
    Store(eyre::Report),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
