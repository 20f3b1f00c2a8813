//! Outfits and garment items as returned by the recommendation service

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One garment as described by the service
///
/// `score` is only present on alternatives. Fields the client does not know
/// about are kept in `extra` so they survive being sent back as part of
/// `current_outfit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GarmentItem {
    /// Opaque image reference, resolved via `GET /images/{image}`
    pub image: String,

    /// Relevance score in [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GarmentItem {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            score: None,
            category: None,
            gender: None,
            extra: Map::new(),
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Slot name (e.g. "top", "bottom", "shoes") to garment
///
/// Slot names are defined by the service, not by the client.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Outfit(BTreeMap<String, GarmentItem>);

impl Outfit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: &str) -> Option<&GarmentItem> {
        self.0.get(slot)
    }

    pub fn contains_slot(&self, slot: &str) -> bool {
        self.0.contains_key(slot)
    }

    /// Put `item` into `slot`, returning what was there before
    pub fn replace(&mut self, slot: impl Into<String>, item: GarmentItem) -> Option<GarmentItem> {
        self.0.insert(slot.into(), item)
    }

    pub fn slots(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GarmentItem)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, GarmentItem)> for Outfit {
    fn from_iter<I: IntoIterator<Item = (S, GarmentItem)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_service_outfit() {
        let json = serde_json::json!({
            "top": {"image": "a.jpg", "category": "shirt", "gender": "men"},
            "bottom": {"image": "b.jpg", "category": null, "gender": "men"}
        });

        let outfit: Outfit = serde_json::from_value(json).unwrap();
        assert_eq!(outfit.len(), 2);
        assert_eq!(outfit.get("top").unwrap().image, "a.jpg");
        assert_eq!(outfit.get("top").unwrap().category.as_deref(), Some("shirt"));
        assert_eq!(outfit.get("bottom").unwrap().category, None);
        assert_eq!(outfit.get("top").unwrap().score, None);
    }

    #[test]
    fn test_unknown_fields_survive() {
        let json = serde_json::json!({"image": "c.jpg", "score": 0.5, "color": "navy"});
        let item: GarmentItem = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(item.extra.get("color"), Some(&Value::from("navy")));
        assert_eq!(serde_json::to_value(&item).unwrap(), json);
    }

    #[test]
    fn test_replace_slot() {
        let mut outfit: Outfit = [("top", GarmentItem::new("a.jpg"))].into_iter().collect();
        let previous = outfit.replace("top", GarmentItem::new("z.jpg"));
        assert_eq!(previous.unwrap().image, "a.jpg");
        assert_eq!(outfit.get("top").unwrap().image, "z.jpg");
        assert_eq!(outfit.slots().collect::<Vec<_>>(), vec!["top"]);
    }
}
