//! Recommendation client error types

use thiserror::Error;

/// Errors that can occur while talking to the recommendation service
///
/// Every variant is a transport failure from the user's point of view: the
/// request is not retried and no state is touched.
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RecommendError {
    /// HTTP status if the service answered with one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if the service itself reported a server-side problem
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| s >= 500)
    }
}
