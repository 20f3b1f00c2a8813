//! Request and response bodies for the recommendation service

use serde::{Deserialize, Serialize};

use crate::domain::{GarmentItem, Outfit, Preferences};

/// Body of `POST /generate-outfit`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(flatten)]
    pub preferences: Preferences,

    /// Unix ms at request time; keeps every call distinct upstream
    pub timestamp: i64,

    /// Optional free-text style hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl GenerateRequest {
    pub fn new(preferences: Preferences, style: Option<String>) -> Self {
        Self {
            preferences,
            timestamp: chrono::Utc::now().timestamp_millis(),
            style,
        }
    }
}

/// Body returned by `POST /generate-outfit`
///
/// The service answers `{"outfit": null}` when nothing matched and
/// `{"error": "..."}` when generation raised.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub outfit: Option<Outfit>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of `POST /slot-alternatives`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativesRequest {
    pub current_outfit: Outfit,

    pub slot: String,

    #[serde(flatten)]
    pub preferences: Preferences,

    pub top_k: usize,
}

/// Body returned by `POST /slot-alternatives`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlternativesResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,

    #[serde(default)]
    pub alternatives: Option<Vec<GarmentItem>>,
}

impl AlternativesResponse {
    /// Alternatives in service order; a missing or null list is empty
    pub fn into_alternatives(self) -> Vec<GarmentItem> {
        self.alternatives.unwrap_or_default()
    }
}
