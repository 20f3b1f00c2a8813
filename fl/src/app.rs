//! View controller
//!
//! Top-level state: which view is showing (generate or closet), the outfit
//! session, the closet and its modals. Each user intent is a method here;
//! failures the user should see come back as a [`Notice`] and are never kept
//! in state.

use std::fmt;
use std::sync::Arc;

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::closet::{ClosetError, ClosetManager, ClosetStore};
use crate::config::{Config, StorageConfig};
use crate::domain::{OutfitId, PreferenceField, Preferences};
use crate::recommend::{
    AlternativesRequest, AlternativesResponse, GenerateRequest, GenerateResponse, RecommendError,
    RecommendationClient, create_client,
};
use crate::session::{AlternativesTicket, GenerationTicket, OutfitSession, Received, SessionError};

/// Open the kv-backed closet described by config
pub fn open_closet(storage: &StorageConfig) -> Result<ClosetManager> {
    let kv = kvstore::KvStore::open(&storage.store_dir).context("Failed to open store")?;
    ClosetManager::open(ClosetStore::new(Box::new(kv), storage.closet_key.clone())).context("Failed to load closet")
}

/// Which view is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Generate,
    Closet,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generate => write!(f, "generate"),
            Self::Closet => write!(f, "closet"),
        }
    }
}

/// Kind of request failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network, status or parse failure
    TransportFailure,
    /// Well-formed response missing its payload
    EmptyResult,
}

/// Blocking message for the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    NoOutfitGenerated,
    GenerateFailed,
    AlternativesFailed,
}

impl Notice {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NoOutfitGenerated => FailureKind::EmptyResult,
            Self::GenerateFailed | Self::AlternativesFailed => FailureKind::TransportFailure,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoOutfitGenerated => write!(f, "No outfit could be generated"),
            Self::GenerateFailed => write!(f, "Failed to generate outfit. Please try again."),
            Self::AlternativesFailed => write!(f, "Failed to load alternatives. Please try again."),
        }
    }
}

/// Result of a request-issuing intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// State was updated from the response
    Updated,
    /// An identical request is already in flight; nothing was sent
    Busy,
    /// The response arrived after a newer request and was dropped
    Stale,
    /// Something the user must be told about
    Notice(Notice),
}

/// The application controller
pub struct App {
    mode: Mode,
    session: OutfitSession,
    closet: ClosetManager,
    client: Arc<dyn RecommendationClient>,
    top_k: usize,
}

impl App {
    pub fn new(
        client: Arc<dyn RecommendationClient>,
        closet: ClosetManager,
        session: OutfitSession,
        top_k: usize,
    ) -> Self {
        Self {
            mode: Mode::Generate,
            session,
            closet,
            client,
            top_k,
        }
    }

    /// Build the controller from config: HTTP client, kv-backed closet
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = create_client(&config.service).context("Failed to create recommendation client")?;
        let closet = open_closet(&config.storage)?;
        let session = OutfitSession::new(config.defaults.preferences());

        info!(base_url = %config.service.base_url, closet = closet.len(), "App initialized");
        Ok(Self::new(client, closet, session, config.service.top_k))
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch views; neither view's state is cleared
    pub fn set_mode(&mut self, mode: Mode) {
        debug!(from = %self.mode, to = %mode, "set_mode: called");
        self.mode = mode;
    }

    pub fn session(&self) -> &OutfitSession {
        &self.session
    }

    pub fn closet(&self) -> &ClosetManager {
        &self.closet
    }

    pub fn client(&self) -> &Arc<dyn RecommendationClient> {
        &self.client
    }

    /// Number of saved outfits, for the header
    pub fn closet_count(&self) -> usize {
        self.closet.len()
    }

    pub fn set_preference(&mut self, field: PreferenceField, value: &str) -> Result<(), SessionError> {
        self.session.set_preference(field, value)
    }

    pub fn set_preferences(&mut self, preferences: Preferences) {
        self.session.set_preferences(preferences);
    }

    pub fn set_style(&mut self, style: Option<String>) {
        self.session.set_style(style);
    }

    // === Generation ===

    /// Start a generation request without sending it
    ///
    /// Returns `None` while a generation is already in flight.
    pub fn begin_generation(&mut self) -> Option<(GenerationTicket, GenerateRequest)> {
        let ticket = self.session.start_generation()?;
        let request = GenerateRequest::new(self.session.preferences(), self.session.style().map(str::to_string));
        Some((ticket, request))
    }

    /// Feed a generation response back into state
    pub fn finish_generation(
        &mut self,
        ticket: GenerationTicket,
        result: Result<GenerateResponse, RecommendError>,
    ) -> Outcome {
        match result {
            Ok(response) => {
                if let Some(error) = &response.error {
                    warn!(%error, "finish_generation: service reported an error");
                }
                match self.session.receive_outfit(ticket, response.outfit) {
                    Received::Applied => Outcome::Updated,
                    Received::Empty => Outcome::Notice(Notice::NoOutfitGenerated),
                    Received::Stale => Outcome::Stale,
                }
            }
            Err(e) => {
                warn!(error = %e, "finish_generation: request failed");
                match self.session.fail_generation(ticket) {
                    Received::Stale => Outcome::Stale,
                    _ => Outcome::Notice(Notice::GenerateFailed),
                }
            }
        }
    }

    /// Generate a new outfit from the current preferences
    pub async fn generate(&mut self) -> Outcome {
        let Some((ticket, request)) = self.begin_generation() else {
            return Outcome::Busy;
        };
        let result = self.client.generate_outfit(request).await;
        self.finish_generation(ticket, result)
    }

    // === Slot alternatives ===

    /// Start an alternatives request for `slot` without sending it
    pub fn begin_alternatives(
        &mut self,
        slot: &str,
    ) -> Result<Option<(AlternativesTicket, AlternativesRequest)>, SessionError> {
        let Some(ticket) = self.session.start_alternatives(slot)? else {
            return Ok(None);
        };
        let current_outfit = self.session.outfit().cloned().ok_or(SessionError::NoOutfit)?;
        let request = AlternativesRequest {
            current_outfit,
            slot: slot.to_string(),
            preferences: self.session.preferences(),
            top_k: self.top_k,
        };
        Ok(Some((ticket, request)))
    }

    /// Feed an alternatives response back into state
    pub fn finish_alternatives(
        &mut self,
        ticket: &AlternativesTicket,
        result: Result<AlternativesResponse, RecommendError>,
    ) -> Outcome {
        match result {
            Ok(response) => match self.session.receive_alternatives(ticket, response.into_alternatives()) {
                Received::Stale => Outcome::Stale,
                _ => Outcome::Updated,
            },
            Err(e) => {
                warn!(slot = %ticket.slot(), error = %e, "finish_alternatives: request failed");
                match self.session.fail_alternatives(ticket) {
                    Received::Stale => Outcome::Stale,
                    _ => Outcome::Notice(Notice::AlternativesFailed),
                }
            }
        }
    }

    /// Ask the service for alternatives to the garment in `slot`
    pub async fn request_alternatives(&mut self, slot: &str) -> Result<Outcome, SessionError> {
        let Some((ticket, request)) = self.begin_alternatives(slot)? else {
            return Ok(Outcome::Busy);
        };
        let result = self.client.slot_alternatives(request).await;
        Ok(self.finish_alternatives(&ticket, result))
    }

    /// Swap in alternative `index` (0-based) for the active slot
    pub fn choose_alternative(&mut self, index: usize) -> Result<String, SessionError> {
        self.session.choose_alternative(index)
    }

    // === Closet ===

    /// Open the naming prompt for the current outfit
    pub fn request_save(&mut self) -> Result<(), ClosetError> {
        self.closet.request_save(self.session.outfit(), self.session.preferences())
    }

    pub fn cancel_save(&mut self) {
        self.closet.cancel_save();
    }

    pub fn confirm_save(&mut self, name: &str) -> Result<OutfitId, ClosetError> {
        Ok(self.closet.confirm_save(name)?.id)
    }

    pub fn begin_rename(&mut self, id: OutfitId) -> bool {
        self.closet.begin_rename(id)
    }

    pub fn set_rename_buffer(&mut self, text: impl Into<String>) {
        self.closet.set_rename_buffer(text);
    }

    pub fn confirm_rename(&mut self) -> Result<(), ClosetError> {
        self.closet.confirm_rename()
    }

    pub fn rename(&mut self, id: OutfitId, name: &str) -> Result<(), ClosetError> {
        self.closet.rename(id, name)
    }

    pub fn delete(&mut self, id: OutfitId) -> Result<bool, ClosetError> {
        self.closet.delete(id)
    }
}
