//! Outfit session state
//!
//! Pure state for the generate view: current preferences, the generated
//! outfit, the alternatives on offer for one slot and the loading flags.
//! No I/O happens here; the controller issues requests and feeds responses
//! back through the `receive_*` transitions.
//!
//! Every outstanding request is identified by a ticket carrying a sequence
//! number. A response is applied only when its ticket is the latest one issued
//! for that kind of request, so a slow reply can never overwrite newer state.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{DomainError, GarmentItem, Outfit, PreferenceField, Preferences};

/// Errors from session transitions
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("No outfit has been generated yet")]
    NoOutfit,

    #[error("Outfit has no '{0}' slot")]
    UnknownSlot(String),

    #[error("No slot is being changed")]
    NoActiveSlot,

    #[error("No alternative #{index} (have {len})")]
    AlternativeOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Preference(#[from] DomainError),
}

/// Handle for an outstanding generation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTicket {
    seq: u64,
}

/// Handle for an outstanding alternatives request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternativesTicket {
    seq: u64,
    slot: String,
}

impl AlternativesTicket {
    pub fn slot(&self) -> &str {
        &self.slot
    }
}

/// What a `receive_*` transition did with a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Received {
    /// Response applied to state
    Applied,
    /// Well-formed response without the expected payload; state unchanged
    Empty,
    /// Superseded by a later request; dropped
    Stale,
}

/// In-memory state of the generate view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutfitSession {
    preferences: Preferences,
    style: Option<String>,
    outfit: Option<Outfit>,
    alternatives: Vec<GarmentItem>,
    active_slot: Option<String>,
    is_generating: bool,
    loading_slot: Option<String>,
    generation_seq: u64,
    alternatives_seq: u64,
}

impl OutfitSession {
    pub fn new(preferences: Preferences) -> Self {
        Self {
            preferences,
            ..Default::default()
        }
    }

    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    pub fn outfit(&self) -> Option<&Outfit> {
        self.outfit.as_ref()
    }

    pub fn alternatives(&self) -> &[GarmentItem] {
        &self.alternatives
    }

    pub fn active_slot(&self) -> Option<&str> {
        self.active_slot.as_deref()
    }

    pub fn is_generating(&self) -> bool {
        self.is_generating
    }

    /// Slot whose alternatives are currently loading, if any
    pub fn loading_slot(&self) -> Option<&str> {
        self.loading_slot.as_deref()
    }

    pub fn is_loading_alternatives(&self) -> bool {
        self.loading_slot.is_some()
    }

    /// Assign one preference; takes effect on the next generation
    pub fn set_preference(&mut self, field: PreferenceField, value: &str) -> Result<(), SessionError> {
        debug!(?field, %value, "set_preference: called");
        self.preferences.set(field, value)?;
        Ok(())
    }

    pub fn set_preferences(&mut self, preferences: Preferences) {
        self.preferences = preferences;
    }

    /// Set or clear the free-text style hint
    pub fn set_style(&mut self, style: Option<String>) {
        self.style = style.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    }

    /// Begin a generation request
    ///
    /// Clears alternatives and the active slot. Returns `None` while another
    /// generation is still in flight. Any outstanding alternatives request
    /// becomes stale.
    pub fn start_generation(&mut self) -> Option<GenerationTicket> {
        if self.is_generating {
            debug!("start_generation: already generating");
            return None;
        }

        self.alternatives.clear();
        self.active_slot = None;
        self.loading_slot = None;
        self.alternatives_seq += 1;

        self.is_generating = true;
        self.generation_seq += 1;
        debug!(seq = self.generation_seq, "start_generation: issued ticket");
        Some(GenerationTicket {
            seq: self.generation_seq,
        })
    }

    /// Apply a generation response
    ///
    /// `None` means the service produced no outfit: the previous outfit is
    /// kept and [`Received::Empty`] is returned so the caller can warn.
    pub fn receive_outfit(&mut self, ticket: GenerationTicket, outfit: Option<Outfit>) -> Received {
        if ticket.seq != self.generation_seq {
            warn!(seq = ticket.seq, latest = self.generation_seq, "receive_outfit: dropping stale response");
            return Received::Stale;
        }

        self.is_generating = false;
        match outfit {
            Some(outfit) => {
                debug!(slots = outfit.len(), "receive_outfit: applied");
                self.outfit = Some(outfit);
                Received::Applied
            }
            None => {
                debug!("receive_outfit: empty result");
                Received::Empty
            }
        }
    }

    /// A generation request failed; only the loading flag changes
    pub fn fail_generation(&mut self, ticket: GenerationTicket) -> Received {
        if ticket.seq != self.generation_seq {
            return Received::Stale;
        }
        self.is_generating = false;
        Received::Applied
    }

    /// Begin an alternatives request for `slot`
    ///
    /// Returns `Ok(None)` while alternatives for that same slot are loading.
    /// Asking for a different slot supersedes the earlier request.
    pub fn start_alternatives(&mut self, slot: &str) -> Result<Option<AlternativesTicket>, SessionError> {
        let outfit = self.outfit.as_ref().ok_or(SessionError::NoOutfit)?;
        if !outfit.contains_slot(slot) {
            return Err(SessionError::UnknownSlot(slot.to_string()));
        }
        if self.loading_slot.as_deref() == Some(slot) {
            debug!(%slot, "start_alternatives: already loading");
            return Ok(None);
        }

        self.active_slot = Some(slot.to_string());
        self.loading_slot = Some(slot.to_string());
        self.alternatives_seq += 1;
        debug!(%slot, seq = self.alternatives_seq, "start_alternatives: issued ticket");
        Ok(Some(AlternativesTicket {
            seq: self.alternatives_seq,
            slot: slot.to_string(),
        }))
    }

    /// Apply an alternatives response, keeping the service's order
    pub fn receive_alternatives(&mut self, ticket: &AlternativesTicket, alternatives: Vec<GarmentItem>) -> Received {
        if ticket.seq != self.alternatives_seq {
            warn!(
                slot = %ticket.slot,
                seq = ticket.seq,
                latest = self.alternatives_seq,
                "receive_alternatives: dropping stale response"
            );
            return Received::Stale;
        }

        self.loading_slot = None;
        debug!(slot = %ticket.slot, count = alternatives.len(), "receive_alternatives: applied");
        self.alternatives = alternatives;
        Received::Applied
    }

    /// An alternatives request failed; only the loading flag changes
    pub fn fail_alternatives(&mut self, ticket: &AlternativesTicket) -> Received {
        if ticket.seq != self.alternatives_seq {
            return Received::Stale;
        }
        self.loading_slot = None;
        Received::Applied
    }

    /// Put `item` into `slot` and close the alternatives list
    pub fn apply_alternative(&mut self, slot: &str, item: GarmentItem) -> Result<(), SessionError> {
        let outfit = self.outfit.as_mut().ok_or(SessionError::NoOutfit)?;
        debug!(%slot, image = %item.image, "apply_alternative: called");
        outfit.replace(slot, item);

        self.alternatives.clear();
        self.active_slot = None;
        self.loading_slot = None;
        self.alternatives_seq += 1;
        Ok(())
    }

    /// Apply the alternative at `index` (0-based) to the active slot
    pub fn choose_alternative(&mut self, index: usize) -> Result<String, SessionError> {
        let slot = self.active_slot.clone().ok_or(SessionError::NoActiveSlot)?;
        let item = self
            .alternatives
            .get(index)
            .cloned()
            .ok_or(SessionError::AlternativeOutOfRange {
                index,
                len: self.alternatives.len(),
            })?;
        self.apply_alternative(&slot, item)?;
        Ok(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Gender, Occasion, Season};
    use proptest::prelude::*;

    fn outfit(pairs: &[(&str, &str)]) -> Outfit {
        pairs.iter().map(|(slot, image)| (*slot, GarmentItem::new(*image))).collect()
    }

    fn session_with_outfit() -> OutfitSession {
        let mut session = OutfitSession::default();
        let ticket = session.start_generation().unwrap();
        session.receive_outfit(ticket, Some(outfit(&[("top", "a.jpg"), ("bottom", "b.jpg")])));
        session
    }

    #[test]
    fn test_generation_replaces_outfit() {
        let mut session = OutfitSession::new(Preferences::new(Gender::Men, Season::Summer, Occasion::Casual));
        let ticket = session.start_generation().unwrap();
        assert!(session.is_generating());

        let generated = outfit(&[("top", "a.jpg"), ("bottom", "b.jpg")]);
        assert_eq!(session.receive_outfit(ticket, Some(generated.clone())), Received::Applied);
        assert_eq!(session.outfit(), Some(&generated));
        assert!(!session.is_generating());
    }

    #[test]
    fn test_empty_generation_keeps_prior_outfit() {
        let mut session = session_with_outfit();
        let before = session.outfit().cloned();

        let ticket = session.start_generation().unwrap();
        assert_eq!(session.receive_outfit(ticket, None), Received::Empty);
        assert_eq!(session.outfit().cloned(), before);
        assert!(!session.is_generating());
    }

    #[test]
    fn test_failed_generation_only_clears_flag() {
        let mut session = session_with_outfit();
        let before = session.outfit().cloned();

        let ticket = session.start_generation().unwrap();
        session.fail_generation(ticket);
        assert_eq!(session.outfit().cloned(), before);
        assert!(!session.is_generating());
    }

    #[test]
    fn test_generation_blocked_while_in_flight() {
        let mut session = OutfitSession::default();
        let ticket = session.start_generation().unwrap();
        assert!(session.start_generation().is_none());
        session.receive_outfit(ticket, None);
        assert!(session.start_generation().is_some());
    }

    #[test]
    fn test_start_generation_clears_alternatives() {
        let mut session = session_with_outfit();
        let alt = session.start_alternatives("top").unwrap().unwrap();
        session.receive_alternatives(&alt, vec![GarmentItem::new("x.jpg").with_score(0.9)]);
        assert_eq!(session.alternatives().len(), 1);

        session.start_generation().unwrap();
        assert!(session.alternatives().is_empty());
        assert_eq!(session.active_slot(), None);
    }

    #[test]
    fn test_alternatives_need_outfit_and_known_slot() {
        let mut session = OutfitSession::default();
        assert_eq!(session.start_alternatives("top"), Err(SessionError::NoOutfit));

        let mut session = session_with_outfit();
        assert_eq!(
            session.start_alternatives("hat"),
            Err(SessionError::UnknownSlot("hat".to_string()))
        );
    }

    #[test]
    fn test_alternatives_order_kept_verbatim() {
        let mut session = session_with_outfit();
        let ticket = session.start_alternatives("top").unwrap().unwrap();
        assert_eq!(session.loading_slot(), Some("top"));

        let list = vec![
            GarmentItem::new("x.jpg").with_score(0.91),
            GarmentItem::new("y.jpg").with_score(0.87),
            GarmentItem::new("z.jpg").with_score(0.52),
        ];
        assert_eq!(session.receive_alternatives(&ticket, list.clone()), Received::Applied);
        assert_eq!(session.alternatives(), list.as_slice());
        assert_eq!(session.active_slot(), Some("top"));
        assert!(!session.is_loading_alternatives());
    }

    #[test]
    fn test_same_slot_blocked_other_slot_allowed() {
        let mut session = session_with_outfit();
        let first = session.start_alternatives("top").unwrap().unwrap();
        assert_eq!(session.start_alternatives("top"), Ok(None));

        let second = session.start_alternatives("bottom").unwrap().unwrap();
        assert_eq!(session.active_slot(), Some("bottom"));

        // The superseded "top" response must not land
        assert_eq!(
            session.receive_alternatives(&first, vec![GarmentItem::new("stale.jpg")]),
            Received::Stale
        );
        assert!(session.alternatives().is_empty());
        assert_eq!(session.loading_slot(), Some("bottom"));

        assert_eq!(
            session.receive_alternatives(&second, vec![GarmentItem::new("fresh.jpg")]),
            Received::Applied
        );
        assert_eq!(session.alternatives()[0].image, "fresh.jpg");
    }

    #[test]
    fn test_generation_makes_pending_alternatives_stale() {
        let mut session = session_with_outfit();
        let alt = session.start_alternatives("top").unwrap().unwrap();

        let gen_ticket = session.start_generation().unwrap();
        assert_eq!(
            session.receive_alternatives(&alt, vec![GarmentItem::new("late.jpg")]),
            Received::Stale
        );
        assert!(session.alternatives().is_empty());
        assert_eq!(session.active_slot(), None);

        session.receive_outfit(gen_ticket, Some(outfit(&[("top", "n.jpg")])));
        assert_eq!(session.outfit().unwrap().get("top").unwrap().image, "n.jpg");
    }

    #[test]
    fn test_failed_alternatives_keep_state() {
        let mut session = session_with_outfit();
        let before = session.clone();
        let ticket = session.start_alternatives("top").unwrap().unwrap();
        session.fail_alternatives(&ticket);

        assert_eq!(session.outfit(), before.outfit());
        assert!(session.alternatives().is_empty());
        assert!(!session.is_loading_alternatives());
    }

    #[test]
    fn test_apply_alternative_requires_outfit() {
        let mut session = OutfitSession::default();
        assert_eq!(
            session.apply_alternative("top", GarmentItem::new("x.jpg")),
            Err(SessionError::NoOutfit)
        );
    }

    #[test]
    fn test_choose_alternative() {
        let mut session = session_with_outfit();
        assert_eq!(session.choose_alternative(0), Err(SessionError::NoActiveSlot));

        let ticket = session.start_alternatives("bottom").unwrap().unwrap();
        session.receive_alternatives(
            &ticket,
            vec![
                GarmentItem::new("p.jpg").with_score(0.8),
                GarmentItem::new("q.jpg").with_score(0.7),
            ],
        );

        assert_eq!(
            session.choose_alternative(5),
            Err(SessionError::AlternativeOutOfRange { index: 5, len: 2 })
        );
        assert_eq!(session.choose_alternative(1), Ok("bottom".to_string()));

        let outfit = session.outfit().unwrap();
        assert_eq!(outfit.get("bottom").unwrap().image, "q.jpg");
        assert_eq!(outfit.get("top").unwrap().image, "a.jpg");
        assert!(session.alternatives().is_empty());
        assert_eq!(session.active_slot(), None);
    }

    #[test]
    fn test_set_preference_and_style() {
        let mut session = OutfitSession::default();
        session.set_preference(PreferenceField::Gender, "women").unwrap();
        assert_eq!(session.preferences().gender, Gender::Women);
        assert!(session.set_preference(PreferenceField::Season, "autumn").is_err());
        assert_eq!(session.preferences().season, Season::Winter);

        session.set_style(Some("  streetwear ".to_string()));
        assert_eq!(session.style(), Some("streetwear"));
        session.set_style(Some("   ".to_string()));
        assert_eq!(session.style(), None);
    }

    fn slot_name() -> impl Strategy<Value = String> {
        "[a-z]{1,8}"
    }

    proptest! {
        #[test]
        fn prop_apply_alternative_touches_only_that_slot(
            slots in proptest::collection::btree_map(slot_name(), "[a-z0-9]{1,10}\\.jpg", 1..8),
            pick in any::<prop::sample::Index>(),
            replacement in "[a-z0-9]{1,10}\\.png",
        ) {
            let original: Outfit = slots.iter().map(|(s, i)| (s.clone(), GarmentItem::new(i.clone()))).collect();
            let slot = slots.keys().nth(pick.index(slots.len())).unwrap().clone();

            let mut session = OutfitSession::default();
            let ticket = session.start_generation().unwrap();
            session.receive_outfit(ticket, Some(original.clone()));
            let prefs_before = session.preferences();

            session.apply_alternative(&slot, GarmentItem::new(replacement.clone())).unwrap();

            let updated = session.outfit().unwrap();
            prop_assert_eq!(updated.len(), original.len());
            for (name, item) in original.iter() {
                if name == slot {
                    prop_assert_eq!(&updated.get(name).unwrap().image, &replacement);
                } else {
                    prop_assert_eq!(updated.get(name), Some(item));
                }
            }
            prop_assert_eq!(session.preferences(), prefs_before);
            prop_assert!(!session.is_generating());
        }
    }
}
