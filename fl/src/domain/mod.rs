//! Domain types for the outfit client

mod outfit;
mod preferences;
mod saved;

pub use outfit::{GarmentItem, Outfit};
pub use preferences::{Gender, Occasion, PreferenceField, Preferences, Season};
pub use saved::{OutfitId, SavedOutfit, default_outfit_name};

use thiserror::Error;

/// Errors from parsing user-supplied domain values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid {field}: '{value}'")]
    InvalidValue { field: &'static str, value: String },

    #[error("Unknown preference '{0}'. Use: gender, season, occasion")]
    UnknownField(String),
}
