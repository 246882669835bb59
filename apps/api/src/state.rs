use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::analysis::normalizer::NormalizerConfig;
use crate::analysis::pipeline::Analyzer;
use crate::analysis::skills::{ExtractionMode, SkillExtractor};
use crate::analysis::vocabulary::SkillVocabulary;
use crate::config::Config;
use crate::extraction::DocumentTextExtractor;
use crate::recommend::{
    http_client, CatalogRecommender, FallbackRecommender, GoogleSearchRecommender,
    ResourceRecommender, UdemyRecommender,
};

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything inside is immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Analyzer,
    pub config: Config,
}

impl AppState {
    pub fn from_config(config: Config) -> Result<Self> {
        let normalizer = NormalizerConfig {
            preserved_symbols: config.preserved_symbols.chars().collect(),
            remove_stopwords: config.remove_stopwords,
        };
        let mode = ExtractionMode::parse(
            &config.extraction_mode,
            config.tfidf_top_k,
            config.tfidf_max_ngram,
        )
        .context("SKILL_EXTRACTION_MODE")?;
        let vocabulary = SkillVocabulary::new(&config.skill_vocabulary, &normalizer);
        info!(
            "Skill extractor: mode={mode}, vocabulary={} labels",
            vocabulary.len()
        );

        let skills = SkillExtractor::new(vocabulary, normalizer, mode);
        let undetectable = skills.undetectable_labels();
        if !undetectable.is_empty() {
            warn!(
                "Labels longer than TFIDF_MAX_NGRAM can never be detected in tfidf mode: {}",
                undetectable.join(", ")
            );
        }
        let recommender = build_recommender(&config)?;
        info!("Course recommender: {}", recommender.name());

        let analyzer = Analyzer::new(
            Arc::new(DocumentTextExtractor),
            Arc::new(skills),
            recommender,
        );

        Ok(Self { analyzer, config })
    }
}

/// Udemy when keyed (falling back to Google when that is keyed too), Google
/// alone when only it is keyed, else the offline catalog.
fn build_recommender(config: &Config) -> Result<Arc<dyn ResourceRecommender>> {
    let max = config.max_courses_per_skill;
    let client = http_client(Duration::from_secs(config.recommender_timeout_secs))
        .context("Failed to build HTTP client")?;

    let google: Option<Box<dyn ResourceRecommender>> = match (
        &config.google_api_key,
        &config.google_search_engine_id,
    ) {
        (Some(key), Some(cx)) => Some(Box::new(GoogleSearchRecommender::new(
            client.clone(),
            key.clone(),
            cx.clone(),
            max,
        ))),
        _ => None,
    };

    let recommender: Arc<dyn ResourceRecommender> = match (&config.udemy_api_key, google) {
        (Some(key), Some(google)) => Arc::new(FallbackRecommender::new(
            Box::new(UdemyRecommender::new(client, key.clone(), max)),
            google,
        )),
        (Some(key), None) => Arc::new(FallbackRecommender::new(
            Box::new(UdemyRecommender::new(client, key.clone(), max)),
            Box::new(CatalogRecommender::new(max)),
        )),
        (None, Some(google)) => Arc::new(FallbackRecommender::new(
            google,
            Box::new(CatalogRecommender::new(max)),
        )),
        (None, None) => Arc::new(CatalogRecommender::new(max)),
    };

    Ok(recommender)
}
