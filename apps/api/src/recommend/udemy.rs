use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{error_for_status, CourseReference, RecommendError, ResourceRecommender};

const UDEMY_API_URL: &str = "https://www.udemy.com/api-2.0/courses/";
const UDEMY_BASE_URL: &str = "https://www.udemy.com";

#[derive(Debug, Deserialize)]
struct CourseSearchResponse {
    #[serde(default)]
    results: Vec<UdemyCourse>,
}

#[derive(Debug, Deserialize)]
struct UdemyCourse {
    title: String,
    url: String,
}

/// Udemy course search (`/api-2.0/courses/?search=`), bearer-authenticated.
pub struct UdemyRecommender {
    client: Client,
    api_key: String,
    max_results: usize,
}

impl UdemyRecommender {
    pub fn new(client: Client, api_key: String, max_results: usize) -> Self {
        Self {
            client,
            api_key,
            max_results,
        }
    }
}

#[async_trait]
impl ResourceRecommender for UdemyRecommender {
    fn name(&self) -> &str {
        "udemy"
    }

    async fn recommend(&self, skill: &str) -> Result<Vec<CourseReference>, RecommendError> {
        let page_size = self.max_results.to_string();
        let response = self
            .client
            .get(UDEMY_API_URL)
            .bearer_auth(&self.api_key)
            .query(&[("search", skill), ("page_size", page_size.as_str())])
            .send()
            .await?;

        let body = error_for_status(response).await?.text().await?;
        let courses = parse_courses(&body, skill, self.max_results)?;
        debug!("udemy returned {} courses for '{skill}'", courses.len());
        Ok(courses)
    }
}

fn parse_courses(
    body: &str,
    skill: &str,
    max_results: usize,
) -> Result<Vec<CourseReference>, RecommendError> {
    let parsed: CourseSearchResponse =
        serde_json::from_str(body).map_err(|e| RecommendError::Parse(e.to_string()))?;

    Ok(parsed
        .results
        .into_iter()
        .take(max_results)
        .map(|course| CourseReference {
            title: course.title,
            url: absolute_url(&course.url),
            skill: skill.to_string(),
        })
        .collect())
}

/// Udemy returns course paths like `/course/python-bootcamp/`.
fn absolute_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("{UDEMY_BASE_URL}/{}", url.trim_start_matches('/'))
    }
}
