//! Recommendation service client
//!
//! Two request types (generate an outfit, fetch alternatives for one slot)
//! plus image resolution, behind the [`RecommendationClient`] trait so the
//! session logic can be driven by a mock in tests.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod http;
mod types;

pub use client::RecommendationClient;
pub use error::RecommendError;
pub use http::HttpRecommendationClient;
pub use types::{AlternativesRequest, AlternativesResponse, GenerateRequest, GenerateResponse};

use crate::config::ServiceConfig;

/// Create the HTTP client described by config
pub fn create_client(config: &ServiceConfig) -> Result<Arc<dyn RecommendationClient>, RecommendError> {
    debug!(base_url = %config.base_url, "create_client: called");
    Ok(Arc::new(HttpRecommendationClient::from_config(config)?))
}
