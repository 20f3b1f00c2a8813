//! FashionLabs - outfit generator client with a digital closet
//!
//! Picks gender, season and occasion preferences, asks a recommendation
//! service for a complete outfit, lets the user swap any garment slot for a
//! ranked alternative, and keeps favourite outfits in a closet persisted to a
//! local key-value store.
//!
//! # Modules
//!
//! - [`domain`] - Preferences, outfits and saved outfits
//! - [`recommend`] - Recommendation service client trait and HTTP implementation
//! - [`session`] - Outfit session state machine
//! - [`closet`] - Saved outfits, naming and rename flows, persistence
//! - [`app`] - View controller tying the session and closet together
//! - [`repl`] - Interactive shell
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod app;
pub mod cli;
pub mod closet;
pub mod config;
pub mod domain;
pub mod recommend;
pub mod repl;
pub mod session;

// Re-export commonly used types
pub use app::{App, FailureKind, Mode, Notice, Outcome};
pub use closet::{ClosetError, ClosetManager, ClosetStore, KeyValueStore, MemoryStore};
pub use config::Config;
pub use domain::{GarmentItem, Gender, Occasion, Outfit, OutfitId, Preferences, SavedOutfit, Season};
pub use recommend::{HttpRecommendationClient, RecommendError, RecommendationClient};
pub use session::{OutfitSession, SessionError};
