//! Saved outfits and the default naming policy

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::{Outfit, Preferences};

/// Saved outfit identifier (creation time in unix ms)
pub type OutfitId = i64;

/// Default label for an outfit saved without a name, e.g. `Outfit - 10/17/2026`
pub fn default_outfit_name<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("Outfit - {}", at.format("%-m/%-d/%Y"))
}

/// An outfit snapshot stored in the closet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedOutfit {
    pub id: OutfitId,

    /// User-editable label
    pub name: String,

    pub outfit: Outfit,

    /// Preferences the outfit was generated with
    pub context: Preferences,

    #[serde(rename = "savedAt")]
    pub saved_at: DateTime<Utc>,
}

impl SavedOutfit {
    /// Name to show, falling back to the date-stamped default for blank names
    pub fn display_name(&self) -> String {
        if self.name.trim().is_empty() {
            default_outfit_name(&self.saved_at)
        } else {
            self.name.clone()
        }
    }
}
