//! Integration tests for FashionLabs
//!
//! Drive the controller end to end with a scripted recommendation client and
//! a real file-backed closet.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fashionlabs::recommend::{AlternativesRequest, AlternativesResponse, GenerateRequest, GenerateResponse};
use fashionlabs::{
    App, ClosetManager, ClosetStore, GarmentItem, Gender, Mode, Notice, Occasion, Outcome, Outfit, OutfitSession,
    Preferences, RecommendError, RecommendationClient, Season,
};
use kvstore::KvStore;
use tempfile::TempDir;

const CLOSET_KEY: &str = "fashionLabsCloset";

/// Answers from fixed queues; an exhausted queue is a 503
#[derive(Default)]
struct ScriptedClient {
    outfits: Mutex<VecDeque<Outfit>>,
    alternatives: Mutex<VecDeque<Vec<GarmentItem>>>,
}

impl ScriptedClient {
    fn with_outfits(outfits: Vec<Outfit>) -> Self {
        Self {
            outfits: Mutex::new(outfits.into()),
            ..Default::default()
        }
    }

    fn queue_alternatives(&self, items: Vec<GarmentItem>) {
        self.alternatives.lock().unwrap().push_back(items);
    }
}

fn unavailable() -> RecommendError {
    RecommendError::ApiError {
        status: 503,
        message: "unavailable".to_string(),
    }
}

#[async_trait]
impl RecommendationClient for ScriptedClient {
    async fn generate_outfit(&self, _request: GenerateRequest) -> Result<GenerateResponse, RecommendError> {
        let outfit = self.outfits.lock().unwrap().pop_front().ok_or_else(unavailable)?;
        Ok(GenerateResponse {
            outfit: Some(outfit),
            error: None,
        })
    }

    async fn slot_alternatives(&self, request: AlternativesRequest) -> Result<AlternativesResponse, RecommendError> {
        let items = self.alternatives.lock().unwrap().pop_front().ok_or_else(unavailable)?;
        Ok(AlternativesResponse {
            slot: Some(request.slot),
            alternatives: Some(items),
        })
    }

    fn image_url(&self, image: &str) -> String {
        format!("http://test/images/{}", image)
    }

    async fn fetch_image(&self, _image: &str) -> Result<Vec<u8>, RecommendError> {
        Err(unavailable())
    }
}

fn outfit(pairs: &[(&str, &str)]) -> Outfit {
    pairs.iter().map(|(slot, image)| (*slot, GarmentItem::new(*image))).collect()
}

fn open_closet(dir: &TempDir) -> ClosetManager {
    let kv = KvStore::open(dir.path()).unwrap();
    ClosetManager::open(ClosetStore::new(Box::new(kv), CLOSET_KEY)).unwrap()
}

fn app(dir: &TempDir, client: Arc<ScriptedClient>, prefs: Preferences) -> App {
    App::new(client, open_closet(dir), OutfitSession::new(prefs), 5)
}

#[tokio::test]
async fn test_generate_swap_save_reload() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let client = Arc::new(ScriptedClient::with_outfits(vec![outfit(&[
        ("top", "1.jpg"),
        ("bottom", "2.jpg"),
        ("shoes", "3.jpg"),
    ])]));
    client.queue_alternatives(vec![
        GarmentItem::new("4.jpg").with_score(0.91),
        GarmentItem::new("5.jpg").with_score(0.77),
    ]);

    let prefs = Preferences::new(Gender::Women, Season::Summer, Occasion::Casual);
    let mut app = app(&dir, client, prefs);

    assert_eq!(app.generate().await, Outcome::Updated);
    assert_eq!(app.request_alternatives("shoes").await, Ok(Outcome::Updated));
    assert_eq!(app.choose_alternative(0), Ok("shoes".to_string()));

    app.request_save().unwrap();
    let id = app.confirm_save("Beach day").unwrap();

    // A fresh process sees the same closet
    let reopened = open_closet(&dir);
    assert_eq!(reopened.len(), 1);
    let saved = reopened.get(id).expect("saved outfit should persist");
    assert_eq!(saved.name, "Beach day");
    assert_eq!(saved.context, prefs);
    assert_eq!(saved.outfit.get("shoes").unwrap().image, "4.jpg");
    assert_eq!(saved.outfit.get("top").unwrap().image, "1.jpg");
}

#[tokio::test]
async fn test_saved_outfit_is_a_snapshot() {
    let dir = TempDir::new().unwrap();
    let client = Arc::new(ScriptedClient::with_outfits(vec![
        outfit(&[("top", "1.jpg")]),
        outfit(&[("top", "9.jpg")]),
    ]));
    let mut app = app(&dir, client, Preferences::default());

    app.generate().await;
    app.request_save().unwrap();
    let id = app.confirm_save("").unwrap();

    app.set_preference(fashionlabs::domain::PreferenceField::Season, "summer")
        .unwrap();
    app.generate().await;
    assert_eq!(app.session().outfit().unwrap().get("top").unwrap().image, "9.jpg");

    let saved = app.closet().get(id).unwrap();
    assert_eq!(saved.outfit.get("top").unwrap().image, "1.jpg");
    assert_eq!(saved.context.season, Season::Winter);
    assert!(saved.name.starts_with("Outfit - "));
}

#[tokio::test]
async fn test_closet_mutations_persist() {
    let dir = TempDir::new().unwrap();
    let client = Arc::new(ScriptedClient::with_outfits(vec![
        outfit(&[("top", "1.jpg")]),
        outfit(&[("top", "2.jpg")]),
    ]));
    let mut app = app(&dir, client, Preferences::default());

    app.generate().await;
    app.request_save().unwrap();
    let first = app.confirm_save("First").unwrap();
    app.generate().await;
    app.request_save().unwrap();
    let second = app.confirm_save("Second").unwrap();
    assert_ne!(first, second);

    // Newest first
    let names: Vec<String> = open_closet(&dir).outfits().iter().map(|o| o.name.clone()).collect();
    assert_eq!(names, vec!["Second", "First"]);

    app.rename(first, "Renamed").unwrap();
    assert_eq!(open_closet(&dir).get(first).unwrap().name, "Renamed");

    assert!(app.delete(second).unwrap());
    assert!(app.delete(first).unwrap());
    assert!(!app.delete(first).unwrap());

    // Deleting the last entry still writes an empty closet
    let kv = KvStore::open(dir.path()).unwrap();
    assert_eq!(kv.get(CLOSET_KEY).unwrap().as_deref(), Some("[]"));
    assert!(open_closet(&dir).is_empty());
}

#[tokio::test]
async fn test_malformed_blob_loads_empty() {
    let dir = TempDir::new().unwrap();
    KvStore::open(dir.path()).unwrap().set(CLOSET_KEY, "{not json").unwrap();

    let closet = open_closet(&dir);
    assert!(closet.is_empty());
}

#[tokio::test]
async fn test_service_failure_keeps_state() {
    let dir = TempDir::new().unwrap();
    let client = Arc::new(ScriptedClient::with_outfits(vec![outfit(&[("top", "1.jpg")])]));
    let mut app = app(&dir, client, Preferences::default());

    app.generate().await;
    let before = app.session().outfit().cloned();

    assert_eq!(app.generate().await, Outcome::Notice(Notice::GenerateFailed));
    assert_eq!(app.session().outfit().cloned(), before);
    assert!(!app.session().is_generating());

    assert_eq!(
        app.request_alternatives("top").await,
        Ok(Outcome::Notice(Notice::AlternativesFailed))
    );
    assert!(app.session().alternatives().is_empty());
}

#[tokio::test]
async fn test_mode_switch_and_rename_editor() {
    let dir = TempDir::new().unwrap();
    let client = Arc::new(ScriptedClient::with_outfits(vec![outfit(&[("top", "1.jpg")])]));
    let mut app = app(&dir, client, Preferences::default());

    app.generate().await;
    app.request_save().unwrap();
    let id = app.confirm_save("Weekend").unwrap();

    app.set_mode(Mode::Closet);
    assert_eq!(app.closet_count(), 1);
    assert!(app.begin_rename(id));
    app.set_rename_buffer("Weekend away");
    app.confirm_rename().unwrap();
    app.set_mode(Mode::Generate);

    assert_eq!(app.session().outfit().unwrap().get("top").unwrap().image, "1.jpg");
    assert_eq!(open_closet(&dir).get(id).unwrap().name, "Weekend away");
}
