//! HTTP implementation of the recommendation client
//!
//! Speaks JSON to the service's `/generate-outfit` and `/slot-alternatives`
//! endpoints and fetches item images from `/images/{image}`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::{
    AlternativesRequest, AlternativesResponse, GenerateRequest, GenerateResponse, RecommendError,
    RecommendationClient,
};
use crate::config::ServiceConfig;

/// reqwest-backed recommendation client
pub struct HttpRecommendationClient {
    base_url: String,
    http: Client,
}

impl HttpRecommendationClient {
    /// Create a new client from configuration
    pub fn from_config(config: &ServiceConfig) -> Result<Self, RecommendError> {
        debug!(?config, "from_config: called");
        Self::new(&config.base_url, Duration::from_millis(config.timeout_ms))
    }

    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RecommendError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(RecommendError::InvalidResponse("Service base URL is empty".to_string()));
        }

        let http = Client::builder().timeout(timeout).build().map_err(RecommendError::Network)?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, RecommendError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "post_json: called");

        let response = self.http.post(url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            debug!(status = status.as_u16(), "post_json: API error");
            return Err(RecommendError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl RecommendationClient for HttpRecommendationClient {
    async fn generate_outfit(&self, request: GenerateRequest) -> Result<GenerateResponse, RecommendError> {
        debug!(preferences = %request.preferences, timestamp = request.timestamp, "generate_outfit: called");
        self.post_json("/generate-outfit", &request).await
    }

    async fn slot_alternatives(&self, request: AlternativesRequest) -> Result<AlternativesResponse, RecommendError> {
        debug!(slot = %request.slot, top_k = request.top_k, "slot_alternatives: called");
        self.post_json("/slot-alternatives", &request).await
    }

    fn image_url(&self, image: &str) -> String {
        format!("{}/images/{}", self.base_url, urlencoding::encode(image))
    }

    async fn fetch_image(&self, image: &str) -> Result<Vec<u8>, RecommendError> {
        let url = self.image_url(image);
        debug!(%url, "fetch_image: called");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RecommendError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
