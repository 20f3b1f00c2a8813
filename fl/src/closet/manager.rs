//! Closet manager
//!
//! CRUD over the saved-outfit list plus the two small UI state machines that
//! front it:
//!
//! ```text
//! naming: Idle --request_save--> Prompting --confirm_save / cancel_save--> Idle
//! rename: Idle --begin_rename(id)--> Editing(id) --confirm_rename--> Idle
//! ```
//!
//! Every mutation rewrites the whole closet through the [`ClosetStore`].

use chrono::{DateTime, Local, Utc};
use tracing::{debug, info};

use super::{ClosetError, ClosetStore};
use crate::domain::{Outfit, OutfitId, Preferences, SavedOutfit, default_outfit_name};

/// Naming prompt state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NamingState {
    #[default]
    Idle,
    /// Prompt is open for a snapshot of the outfit being saved
    Prompting { outfit: Outfit, context: Preferences },
}

/// Rename editor state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RenameState {
    #[default]
    Idle,
    Editing { id: OutfitId, buffer: String },
}

/// Owns the closet and its persistence
pub struct ClosetManager {
    store: ClosetStore,
    closet: Vec<SavedOutfit>,
    naming: NamingState,
    rename: RenameState,
}

impl ClosetManager {
    /// Load the closet from `store`
    pub fn open(store: ClosetStore) -> Result<Self, ClosetError> {
        let closet = store.load()?;
        info!(count = closet.len(), "Closet opened");
        Ok(Self {
            store,
            closet,
            naming: NamingState::Idle,
            rename: RenameState::Idle,
        })
    }

    /// Saved outfits, newest first
    pub fn outfits(&self) -> &[SavedOutfit] {
        &self.closet
    }

    pub fn len(&self) -> usize {
        self.closet.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closet.is_empty()
    }

    pub fn get(&self, id: OutfitId) -> Option<&SavedOutfit> {
        self.closet.iter().find(|o| o.id == id)
    }

    pub fn naming(&self) -> &NamingState {
        &self.naming
    }

    pub fn rename_state(&self) -> &RenameState {
        &self.rename
    }

    pub fn is_prompting(&self) -> bool {
        matches!(self.naming, NamingState::Prompting { .. })
    }

    /// Id being renamed, if the editor is open
    pub fn editing_id(&self) -> Option<OutfitId> {
        match self.rename {
            RenameState::Editing { id, .. } => Some(id),
            RenameState::Idle => None,
        }
    }

    /// Open the naming prompt for `outfit`
    pub fn request_save(&mut self, outfit: Option<&Outfit>, context: Preferences) -> Result<(), ClosetError> {
        let outfit = outfit.ok_or(ClosetError::NoOutfit)?;
        debug!(slots = outfit.len(), "request_save: prompting for name");
        self.naming = NamingState::Prompting {
            outfit: outfit.clone(),
            context,
        };
        Ok(())
    }

    /// Close the prompt without saving
    pub fn cancel_save(&mut self) {
        debug!("cancel_save: called");
        self.naming = NamingState::Idle;
    }

    /// Save the prompted outfit under `name`
    pub fn confirm_save(&mut self, name: &str) -> Result<&SavedOutfit, ClosetError> {
        self.confirm_save_at(name, Utc::now())
    }

    /// Save the prompted outfit, taking `now` as the creation time
    ///
    /// A blank name becomes the date-stamped default. The new entry goes to
    /// the front of the closet.
    pub fn confirm_save_at(&mut self, name: &str, now: DateTime<Utc>) -> Result<&SavedOutfit, ClosetError> {
        let NamingState::Prompting { outfit, context } = std::mem::take(&mut self.naming) else {
            return Err(ClosetError::NotPrompting);
        };

        let id = match self.next_id(now) {
            Ok(id) => id,
            Err(e) => {
                self.naming = NamingState::Prompting { outfit, context };
                return Err(e);
            }
        };

        let trimmed = name.trim();
        let final_name = if trimmed.is_empty() {
            default_outfit_name(&now.with_timezone(&Local))
        } else {
            trimmed.to_string()
        };

        self.closet.insert(
            0,
            SavedOutfit {
                id,
                name: final_name,
                outfit,
                context,
                saved_at: now,
            },
        );
        if let Err(e) = self.store.save(&self.closet) {
            // Undo the insert and reopen the prompt with the same snapshot
            let unsaved = self.closet.remove(0);
            self.naming = NamingState::Prompting {
                outfit: unsaved.outfit,
                context: unsaved.context,
            };
            return Err(e);
        }

        info!(id, count = self.closet.len(), "Saved outfit to closet");
        Ok(&self.closet[0])
    }

    /// Current time in ms, bumped past any existing id
    fn next_id(&self, now: DateTime<Utc>) -> Result<OutfitId, ClosetError> {
        let candidate = now.timestamp_millis();
        match self.closet.iter().map(|o| o.id).max() {
            Some(max) if max >= candidate => max.checked_add(1).ok_or(ClosetError::IdsExhausted),
            _ => Ok(candidate),
        }
    }

    /// Open the rename editor for `id` with its current name
    ///
    /// Returns false (and leaves state alone) if no such outfit exists.
    pub fn begin_rename(&mut self, id: OutfitId) -> bool {
        let Some(saved) = self.get(id) else {
            debug!(id, "begin_rename: no such outfit");
            return false;
        };
        self.rename = RenameState::Editing {
            id,
            buffer: saved.name.clone(),
        };
        true
    }

    /// Update the rename editor's buffer
    pub fn set_rename_buffer(&mut self, text: impl Into<String>) {
        if let RenameState::Editing { buffer, .. } = &mut self.rename {
            *buffer = text.into();
        }
    }

    /// Commit the rename editor (Enter or focus loss)
    ///
    /// No-op when the editor is closed or its outfit has since been deleted.
    pub fn confirm_rename(&mut self) -> Result<(), ClosetError> {
        let RenameState::Editing { id, buffer } = std::mem::take(&mut self.rename) else {
            return Ok(());
        };
        match self.rename(id, &buffer) {
            Err(ClosetError::NotFound(_)) => Ok(()),
            other => other,
        }
    }

    /// Replace the name of outfit `id`; all other fields stay as they are
    ///
    /// Every entry carrying `id` is renamed, so a blob with duplicate ids
    /// stays consistent.
    pub fn rename(&mut self, id: OutfitId, new_name: &str) -> Result<(), ClosetError> {
        if self.get(id).is_none() {
            return Err(ClosetError::NotFound(id));
        }

        let previous = self.closet.clone();
        for saved in self.closet.iter_mut().filter(|o| o.id == id) {
            saved.name = new_name.to_string();
        }
        if let Err(e) = self.store.save(&self.closet) {
            self.closet = previous;
            return Err(e);
        }

        info!(id, name = %new_name, "Renamed outfit");
        Ok(())
    }

    /// Remove every outfit with `id`; returns whether anything was removed
    ///
    /// Deleting an absent id changes nothing.
    pub fn delete(&mut self, id: OutfitId) -> Result<bool, ClosetError> {
        if self.get(id).is_none() {
            debug!(id, "delete: no such outfit");
            return Ok(false);
        }

        let previous = self.closet.clone();
        self.closet.retain(|o| o.id != id);
        if let Err(e) = self.store.save(&self.closet) {
            self.closet = previous;
            return Err(e);
        }

        if self.editing_id() == Some(id) {
            self.rename = RenameState::Idle;
        }

        info!(id, count = self.closet.len(), "Deleted outfit from closet");
        Ok(true)
    }
}
