use async_trait::async_trait;
use reqwest::Url;

use super::{CourseReference, RecommendError, ResourceRecommender};

/// (platform, search page, query parameter).
const PLATFORMS: &[(&str, &str, &str)] = &[
    ("Coursera", "https://www.coursera.org/search", "query"),
    ("Udemy", "https://www.udemy.com/courses/search/", "q"),
    ("edX", "https://www.edx.org/search", "q"),
];

/// Offline recommender: links to each platform's search page for the skill.
/// Used when no search API is configured.
#[derive(Debug, Clone)]
pub struct CatalogRecommender {
    max_results: usize,
}

impl CatalogRecommender {
    pub fn new(max_results: usize) -> Self {
        Self { max_results }
    }
}

#[async_trait]
impl ResourceRecommender for CatalogRecommender {
    fn name(&self) -> &str {
        "catalog"
    }

    async fn recommend(&self, skill: &str) -> Result<Vec<CourseReference>, RecommendError> {
        let skill = skill.trim();
        if skill.is_empty() {
            return Ok(Vec::new());
        }
        PLATFORMS
            .iter()
            .take(self.max_results)
            .map(|(platform, page, param)| -> Result<CourseReference, RecommendError> {
                let url = Url::parse_with_params(page, &[(*param, skill)])
                    .map_err(|e| RecommendError::Parse(format!("{platform} search URL: {e}")))?;
                Ok(CourseReference {
                    title: format!("{skill} courses on {platform}"),
                    url: url.into(),
                    skill: skill.to_string(),
                })
            })
            .collect()
    }
}
