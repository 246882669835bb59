//! Resource Recommender: suggests courses for a missing skill.
//!
//! The analysis pipeline only sees `Arc<dyn ResourceRecommender>`; backends are
//! chosen at startup from whichever API keys are configured. Errors stay inside
//! this boundary: the pipeline turns them into an empty course list.

pub mod catalog;
pub mod google;
pub mod udemy;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

pub use catalog::CatalogRecommender;
pub use google::GoogleSearchRecommender;
pub use udemy::UdemyRecommender;

pub const DEFAULT_MAX_RESULTS: usize = 5;

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseReference {
    pub title: String,
    pub url: String,
    pub skill: String,
}

#[async_trait]
pub trait ResourceRecommender: Send + Sync {
    /// Short label for logs and reports ("udemy", "google", "catalog", ...).
    fn name(&self) -> &str;

    async fn recommend(&self, skill: &str) -> Result<Vec<CourseReference>, RecommendError>;
}

/// Tries `primary`; on error, asks `secondary`. An empty but successful
/// primary answer is returned as-is.
pub struct FallbackRecommender {
    primary: Box<dyn ResourceRecommender>,
    secondary: Box<dyn ResourceRecommender>,
}

impl FallbackRecommender {
    pub fn new(
        primary: Box<dyn ResourceRecommender>,
        secondary: Box<dyn ResourceRecommender>,
    ) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait]
impl ResourceRecommender for FallbackRecommender {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn recommend(&self, skill: &str) -> Result<Vec<CourseReference>, RecommendError> {
        match self.primary.recommend(skill).await {
            Ok(courses) => Ok(courses),
            Err(e) => {
                warn!(
                    "{} recommender failed for '{skill}': {e}; falling back to {}",
                    self.primary.name(),
                    self.secondary.name()
                );
                self.secondary.recommend(skill).await
            }
        }
    }
}

/// Shared HTTP client for the remote backends.
pub fn http_client(timeout: Duration) -> Result<Client, RecommendError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Maps an unsuccessful HTTP response into `RecommendError::Api`.
async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response, RecommendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(RecommendError::Api {
        status: status.as_u16(),
        message,
    })
}


#[cfg(test)]
mod tests {
    use super::testing::StubRecommender;
    use super::*;

    #[tokio::test]
    async fn test_fallback_uses_primary_when_it_succeeds() {
        let rec = FallbackRecommender::new(
            Box::new(StubRecommender::ok("primary", vec![("Rust 101", "https://a/rust")])),
            Box::new(StubRecommender::ok("secondary", vec![("Other", "https://b/other")])),
        );
        let courses = rec.recommend("Rust").await.unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].title, "Rust 101");
        assert_eq!(courses[0].skill, "Rust");
    }

    #[tokio::test]
    async fn test_fallback_switches_on_primary_error() {
        let rec = FallbackRecommender::new(
            Box::new(StubRecommender::failing("primary")),
            Box::new(StubRecommender::ok("secondary", vec![("SQL Basics", "https://b/sql")])),
        );
        let courses = rec.recommend("SQL").await.unwrap();
        assert_eq!(courses[0].title, "SQL Basics");
    }

    #[tokio::test]
    async fn test_fallback_surfaces_secondary_error() {
        let rec = FallbackRecommender::new(
            Box::new(StubRecommender::failing("primary")),
            Box::new(StubRecommender::failing("secondary")),
        );
        assert!(rec.recommend("SQL").await.is_err());
    }

    #[tokio::test]
    async fn test_fallback_keeps_empty_primary_answer() {
        let rec = FallbackRecommender::new(
            Box::new(StubRecommender::ok("primary", vec![])),
            Box::new(StubRecommender::ok("secondary", vec![("X", "https://x")])),
        );
        assert!(rec.recommend("Cobol").await.unwrap().is_empty());
    }
}
