use anyhow::{Context, Result};

use crate::analysis::normalizer::DEFAULT_PRESERVED_SYMBOLS;
use crate::analysis::skills::{DEFAULT_MAX_NGRAM, DEFAULT_TOP_K};
use crate::analysis::vocabulary::DEFAULT_SKILLS;
use crate::recommend::DEFAULT_MAX_RESULTS;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub skill_vocabulary: Vec<String>,
    pub extraction_mode: String,
    pub tfidf_top_k: usize,
    pub tfidf_max_ngram: usize,
    pub preserved_symbols: String,
    pub remove_stopwords: bool,
    pub max_courses_per_skill: usize,
    pub recommender_timeout_secs: u64,
    pub udemy_api_key: Option<String>,
    pub google_api_key: Option<String>,
    pub google_search_engine_id: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key → value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            port: parse_or(&get, "PORT", 8080)?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            skill_vocabulary: get("SKILL_VOCABULARY")
                .map(|v| parse_list(&v))
                .unwrap_or_else(|| DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect()),
            extraction_mode: get("SKILL_EXTRACTION_MODE").unwrap_or_else(|| "vocabulary".to_string()),
            tfidf_top_k: parse_or(&get, "TFIDF_TOP_K", DEFAULT_TOP_K)?,
            tfidf_max_ngram: parse_or(&get, "TFIDF_MAX_NGRAM", DEFAULT_MAX_NGRAM)?,
            // Set but empty means "preserve nothing", unlike the other keys.
            preserved_symbols: lookup("PRESERVED_SYMBOLS")
                .map(|v| v.trim().to_string())
                .unwrap_or_else(|| DEFAULT_PRESERVED_SYMBOLS.to_string()),
            remove_stopwords: parse_or(&get, "REMOVE_STOPWORDS", true)?,
            max_courses_per_skill: parse_or(&get, "MAX_COURSES_PER_SKILL", DEFAULT_MAX_RESULTS)?,
            recommender_timeout_secs: parse_or(&get, "RECOMMENDER_TIMEOUT_SECS", 10)?,
            udemy_api_key: get("UDEMY_API_KEY"),
            google_api_key: get("GOOGLE_API_KEY"),
            google_search_engine_id: get("GOOGLE_SEARCH_ENGINE_ID"),
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        None => Ok(default),
    }
}

/// Comma-separated list, blanks dropped.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
