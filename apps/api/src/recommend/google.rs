use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{error_for_status, CourseReference, RecommendError, ResourceRecommender};

const CUSTOM_SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";
/// Custom Search caps `num` at 10.
const MAX_NUM: usize = 10;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    title: String,
    link: String,
}

/// Course search through the Google Custom Search JSON API, restricted to
/// the big course platforms.
pub struct GoogleSearchRecommender {
    client: Client,
    api_key: String,
    search_engine_id: String,
    max_results: usize,
}

impl GoogleSearchRecommender {
    pub fn new(
        client: Client,
        api_key: String,
        search_engine_id: String,
        max_results: usize,
    ) -> Self {
        Self {
            client,
            api_key,
            search_engine_id,
            max_results,
        }
    }
}

pub fn course_query(skill: &str) -> String {
    format!("best {skill} online course site:udemy.com OR site:coursera.org OR site:edx.org")
}

#[async_trait]
impl ResourceRecommender for GoogleSearchRecommender {
    fn name(&self) -> &str {
        "google"
    }

    async fn recommend(&self, skill: &str) -> Result<Vec<CourseReference>, RecommendError> {
        let query = course_query(skill);
        let num = self.max_results.clamp(1, MAX_NUM).to_string();
        let response = self
            .client
            .get(CUSTOM_SEARCH_URL)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.search_engine_id.as_str()),
                ("q", query.as_str()),
                ("num", num.as_str()),
            ])
            .send()
            .await?;

        let body = error_for_status(response).await?.text().await?;
        let courses = parse_items(&body, skill, self.max_results)?;
        debug!("google returned {} courses for '{skill}'", courses.len());
        Ok(courses)
    }
}

fn parse_items(
    body: &str,
    skill: &str,
    max_results: usize,
) -> Result<Vec<CourseReference>, RecommendError> {
    let parsed: SearchResponse =
        serde_json::from_str(body).map_err(|e| RecommendError::Parse(e.to_string()))?;

    Ok(parsed
        .items
        .into_iter()
        .take(max_results)
        .map(|item| CourseReference {
            title: item.title,
            url: item.link,
            skill: skill.to_string(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_targets_course_sites() {
        let q = course_query("Power BI");
        assert!(q.starts_with("best Power BI online course"));
        assert!(q.contains("site:coursera.org"));
    }

    #[test]
    fn test_parse_items() {
        let body = r#"{
            "kind": "customsearch#search",
            "items": [
                {"title": "Power BI Essentials | Coursera", "link": "https://www.coursera.org/learn/power-bi", "snippet": "..."}
            ]
        }"#;
        let courses = parse_items(body, "Power BI", 5).unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].url, "https://www.coursera.org/learn/power-bi");
        assert_eq!(courses[0].skill, "Power BI");
    }

    #[test]
    fn test_parse_items_no_results() {
        let body = r#"{"kind": "customsearch#search", "searchInformation": {"totalResults": "0"}}"#;
        assert!(parse_items(body, "Cobol", 5).unwrap().is_empty());
    }
}
