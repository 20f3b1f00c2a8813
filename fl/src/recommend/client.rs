//! RecommendationClient trait definition

use async_trait::async_trait;

use super::{AlternativesRequest, AlternativesResponse, GenerateRequest, GenerateResponse, RecommendError};

/// Client for the outfit recommendation service
///
/// Each call is a single request/response exchange with no retry.
#[async_trait]
pub trait RecommendationClient: Send + Sync {
    /// `POST /generate-outfit`
    async fn generate_outfit(&self, request: GenerateRequest) -> Result<GenerateResponse, RecommendError>;

    /// `POST /slot-alternatives`
    async fn slot_alternatives(&self, request: AlternativesRequest) -> Result<AlternativesResponse, RecommendError>;

    /// Absolute URL for an item's image reference
    fn image_url(&self, image: &str) -> String;

    /// `GET /images/{image}`
    async fn fetch_image(&self, image: &str) -> Result<Vec<u8>, RecommendError>;
}
