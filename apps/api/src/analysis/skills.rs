//! Skill Extractor: maps normalized tokens to a set of canonical skill labels.
//!
//! One interface, strategy picked by `ExtractionMode`:
//! - `Vocabulary`: contiguous token-sequence match of each vocabulary label.
//! - `TfIdf`: top-K TF-IDF terms, intersected with the vocabulary when one is
//!   configured, else taken as free-form labels. A label longer than
//!   `max_ngram` tokens is never a candidate term, so it cannot be detected.
//! - `Hybrid`: vocabulary matches plus every top-K term, canonicalized where
//!   the term equals a label and kept free-form otherwise.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::normalizer::{normalize, NormalizerConfig};
use crate::analysis::tfidf::TfIdfModel;
use crate::analysis::vocabulary::SkillVocabulary;

pub const DEFAULT_TOP_K: usize = 10;
pub const DEFAULT_MAX_NGRAM: usize = 2;

#[derive(Debug, Error, PartialEq)]
pub enum SkillError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

// ────────────────────────────────────────────────────────────────────────────
// SkillSet
// ────────────────────────────────────────────────────────────────────────────

/// A set of canonical skill labels. Always iterates in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillSet(BTreeSet<String>);

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>) -> bool {
        self.0.insert(label.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn intersection(&self, other: &SkillSet) -> SkillSet {
        SkillSet(self.0.intersection(&other.0).cloned().collect())
    }

    pub fn difference(&self, other: &SkillSet) -> SkillSet {
        SkillSet(self.0.difference(&other.0).cloned().collect())
    }

    pub fn union(&self, other: &SkillSet) -> SkillSet {
        SkillSet(self.0.union(&other.0).cloned().collect())
    }
}

impl<S: Into<String>> FromIterator<S> for SkillSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        SkillSet(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a SkillSet {
    type Item = &'a String;
    type IntoIter = std::collections::btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Extraction mode
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractionMode {
    #[default]
    Vocabulary,
    TfIdf { top_k: usize, max_ngram: usize },
    Hybrid { top_k: usize, max_ngram: usize },
}

impl ExtractionMode {
    /// Parses a mode name, attaching the TF-IDF parameters where they apply.
    pub fn parse(name: &str, top_k: usize, max_ngram: usize) -> Result<Self, SkillError> {
        if top_k == 0 || max_ngram == 0 {
            return Err(SkillError::InvalidConfiguration(
                "top_k and max_ngram must be at least 1".to_string(),
            ));
        }
        match name.trim().to_lowercase().as_str() {
            "vocabulary" | "exact" => Ok(ExtractionMode::Vocabulary),
            "tfidf" | "tf-idf" | "statistical" => Ok(ExtractionMode::TfIdf { top_k, max_ngram }),
            "hybrid" => Ok(ExtractionMode::Hybrid { top_k, max_ngram }),
            other => Err(SkillError::InvalidConfiguration(format!(
                "unsupported skill extraction mode '{other}' (expected vocabulary, tfidf or hybrid)"
            ))),
        }
    }

    fn statistical_params(&self) -> Option<(usize, usize)> {
        match *self {
            ExtractionMode::Vocabulary => None,
            ExtractionMode::TfIdf { top_k, max_ngram }
            | ExtractionMode::Hybrid { top_k, max_ngram } => Some((top_k, max_ngram)),
        }
    }

    fn uses_vocabulary_match(&self) -> bool {
        matches!(self, ExtractionMode::Vocabulary | ExtractionMode::Hybrid { .. })
    }

    /// Whether top-K terms outside the vocabulary are reported as skills.
    fn keeps_free_form_terms(&self, vocabulary: &SkillVocabulary) -> bool {
        match self {
            ExtractionMode::Vocabulary => false,
            ExtractionMode::TfIdf { .. } => vocabulary.is_empty(),
            ExtractionMode::Hybrid { .. } => true,
        }
    }
}

impl FromStr for ExtractionMode {
    type Err = SkillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExtractionMode::parse(s, DEFAULT_TOP_K, DEFAULT_MAX_NGRAM)
    }
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionMode::Vocabulary => write!(f, "vocabulary"),
            ExtractionMode::TfIdf { .. } => write!(f, "tfidf"),
            ExtractionMode::Hybrid { .. } => write!(f, "hybrid"),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Extraction
// ────────────────────────────────────────────────────────────────────────────

/// Extracts skills from one token stream. In statistical modes the document
/// is its own IDF corpus.
pub fn extract_skills(
    tokens: &[String],
    vocabulary: &SkillVocabulary,
    mode: &ExtractionMode,
) -> SkillSet {
    let mut skills = SkillSet::new();
    if tokens.is_empty() {
        return skills;
    }

    if mode.uses_vocabulary_match() {
        skills = skills.union(&match_vocabulary(tokens, vocabulary));
    }
    if let Some((top_k, max_ngram)) = mode.statistical_params() {
        let model = TfIdfModel::fit(&[tokens], max_ngram);
        let free_form = mode.keeps_free_form_terms(vocabulary);
        skills = skills.union(&statistical_skills(&model, 0, top_k, vocabulary, free_form));
    }
    skills
}

/// Exact vocabulary match: a label is present when its normalized token
/// sequence occurs contiguously in `tokens`.
pub fn match_vocabulary(tokens: &[String], vocabulary: &SkillVocabulary) -> SkillSet {
    vocabulary
        .entries()
        .iter()
        .filter(|entry| contains_sequence(tokens, &entry.tokens))
        .map(|entry| entry.label.clone())
        .collect()
}

fn contains_sequence(haystack: &[String], needle: &[String]) -> bool {
    !needle.is_empty()
        && needle.len() <= haystack.len()
        && haystack.windows(needle.len()).any(|w| w == needle)
}

/// Top-K terms of `doc`, mapped to canonical labels. Terms that match no label
/// are kept only when `free_form` is set.
fn statistical_skills(
    model: &TfIdfModel,
    doc: usize,
    top_k: usize,
    vocabulary: &SkillVocabulary,
    free_form: bool,
) -> SkillSet {
    model
        .top_terms(doc, top_k)
        .into_iter()
        .filter_map(|t| match vocabulary.canonical_for(&t.term) {
            Some(label) => Some(label.to_string()),
            None if free_form => Some(t.term),
            None => None,
        })
        .collect()
}

/// Caller-owned extraction resource: vocabulary, normalizer and mode bundled
/// once at startup and shared read-only across requests.
#[derive(Debug, Clone)]
pub struct SkillExtractor {
    vocabulary: SkillVocabulary,
    normalizer: NormalizerConfig,
    mode: ExtractionMode,
}

impl SkillExtractor {
    pub fn new(
        vocabulary: SkillVocabulary,
        normalizer: NormalizerConfig,
        mode: ExtractionMode,
    ) -> Self {
        Self {
            vocabulary,
            normalizer,
            mode,
        }
    }

    pub fn vocabulary(&self) -> &SkillVocabulary {
        &self.vocabulary
    }

    pub fn mode(&self) -> &ExtractionMode {
        &self.mode
    }

    /// Labels the configured mode can never report: in `TfIdf` mode, those
    /// with more tokens than `max_ngram`.
    pub fn undetectable_labels(&self) -> Vec<&str> {
        match self.mode {
            ExtractionMode::TfIdf { max_ngram, .. } => self
                .vocabulary
                .entries()
                .iter()
                .filter(|entry| entry.tokens.len() > max_ngram)
                .map(|entry| entry.label.as_str())
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        normalize(text, &self.normalizer)
    }

    pub fn extract(&self, tokens: &[String]) -> SkillSet {
        extract_skills(tokens, &self.vocabulary, &self.mode)
    }

    /// Extracts skills from a resume and a job description together, so the
    /// statistical modes weigh terms against both documents.
    pub fn extract_pair(&self, resume: &[String], job: &[String]) -> (SkillSet, SkillSet) {
        let mut resume_skills = SkillSet::new();
        let mut job_skills = SkillSet::new();

        if self.mode.uses_vocabulary_match() {
            resume_skills = match_vocabulary(resume, &self.vocabulary);
            job_skills = match_vocabulary(job, &self.vocabulary);
        }

        if let Some((top_k, max_ngram)) = self.mode.statistical_params() {
            let model = TfIdfModel::fit(&[resume, job], max_ngram);
            let free_form = self.mode.keeps_free_form_terms(&self.vocabulary);
            let vocab = &self.vocabulary;
            resume_skills =
                resume_skills.union(&statistical_skills(&model, 0, top_k, vocab, free_form));
            job_skills = job_skills.union(&statistical_skills(&model, 1, top_k, vocab, free_form));
        }

        (resume_skills, job_skills)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(labels: &[&str]) -> SkillVocabulary {
        SkillVocabulary::new(labels.iter().copied(), &NormalizerConfig::default())
    }

    fn tokens(text: &str) -> Vec<String> {
        normalize(text, &NormalizerConfig::default())
    }

    fn set(labels: &[&str]) -> SkillSet {
        labels.iter().copied().collect()
    }

    #[test]
    fn test_mode_parse_known_names() {
        assert_eq!(
            ExtractionMode::parse("vocabulary", 5, 2).unwrap(),
            ExtractionMode::Vocabulary
        );
        assert_eq!(
            ExtractionMode::parse("TF-IDF", 5, 2).unwrap(),
            ExtractionMode::TfIdf {
                top_k: 5,
                max_ngram: 2
            }
        );
        assert_eq!(
            "hybrid".parse::<ExtractionMode>().unwrap(),
            ExtractionMode::Hybrid {
                top_k: DEFAULT_TOP_K,
                max_ngram: DEFAULT_MAX_NGRAM
            }
        );
    }

    #[test]
    fn test_mode_parse_unknown_is_invalid_configuration() {
        let err = ExtractionMode::parse("embeddings", 5, 2).unwrap_err();
        assert!(matches!(err, SkillError::InvalidConfiguration(_)));
        assert!(err.to_string().contains("embeddings"));
    }

    #[test]
    fn test_mode_parse_rejects_zero_top_k() {
        assert!(ExtractionMode::parse("tfidf", 0, 2).is_err());
    }

    #[test]
    fn test_vocabulary_scenario_resume_and_job() {
        let v = vocab(&["Python", "SQL", "Power BI"]);
        let mode = ExtractionMode::Vocabulary;

        let resume = extract_skills(&tokens("I know Python and SQL"), &v, &mode);
        let job = extract_skills(&tokens("Requires Python, SQL, and Power BI"), &v, &mode);

        assert_eq!(resume, set(&["Python", "SQL"]));
        assert_eq!(job, set(&["Python", "SQL", "Power BI"]));
    }

    #[test]
    fn test_vocabulary_match_is_token_anchored() {
        let v = vocab(&["SQL", "Java"]);
        let skills = extract_skills(
            &tokens("MySQL and JavaScript expert"),
            &v,
            &ExtractionMode::Vocabulary,
        );
        assert!(skills.is_empty());
    }

    #[test]
    fn test_multi_word_skill_requires_contiguous_tokens() {
        let v = vocab(&["Machine Learning"]);
        let mode = ExtractionMode::Vocabulary;
        assert!(extract_skills(&tokens("machine shop learning"), &v, &mode).is_empty());
        assert_eq!(
            extract_skills(&tokens("Applied MACHINE learning."), &v, &mode),
            set(&["Machine Learning"])
        );
    }

    #[test]
    fn test_symbol_skills_match() {
        let v = vocab(&["C++", "Node.js", "C#"]);
        let skills = extract_skills(
            &tokens("Backend in Node.js; tooling in C++."),
            &v,
            &ExtractionMode::Vocabulary,
        );
        assert_eq!(skills, set(&["C++", "Node.js"]));
    }

    #[test]
    fn test_empty_tokens_yield_empty_set() {
        let v = vocab(&["Python"]);
        for mode in [
            ExtractionMode::Vocabulary,
            ExtractionMode::TfIdf {
                top_k: 5,
                max_ngram: 2,
            },
        ] {
            assert!(extract_skills(&[], &v, &mode).is_empty());
        }
    }

    #[test]
    fn test_empty_vocabulary_vocabulary_mode_is_empty() {
        let skills = extract_skills(
            &tokens("python sql"),
            &SkillVocabulary::default(),
            &ExtractionMode::Vocabulary,
        );
        assert!(skills.is_empty());
    }

    #[test]
    fn test_tfidf_without_vocabulary_returns_free_form_terms() {
        let mode = ExtractionMode::TfIdf {
            top_k: 1,
            max_ngram: 1,
        };
        let skills = extract_skills(
            &tokens("kubernetes kubernetes kubernetes terraform"),
            &SkillVocabulary::default(),
            &mode,
        );
        assert_eq!(skills, set(&["kubernetes"]));
    }

    #[test]
    fn test_tfidf_with_vocabulary_intersects() {
        let v = vocab(&["Power BI", "Python"]);
        let mode = ExtractionMode::TfIdf {
            top_k: 10,
            max_ngram: 2,
        };
        let skills = extract_skills(&tokens("power bi dashboards and reporting"), &v, &mode);
        assert_eq!(skills, set(&["Power BI"]));
    }

    #[test]
    fn test_hybrid_adds_salient_terms_outside_vocabulary() {
        let v = vocab(&["Python", "SQL"]);
        let text = tokens("python kubernetes kubernetes");
        let hybrid = ExtractionMode::Hybrid {
            top_k: 2,
            max_ngram: 1,
        };

        assert_eq!(
            extract_skills(&text, &v, &ExtractionMode::Vocabulary),
            set(&["Python"])
        );
        assert_eq!(extract_skills(&text, &v, &hybrid), set(&["Python", "kubernetes"]));
    }

    #[test]
    fn test_hybrid_keeps_vocabulary_matches_outside_top_k() {
        let v = vocab(&["SQL"]);
        let mode = ExtractionMode::Hybrid {
            top_k: 1,
            max_ngram: 1,
        };
        let skills = extract_skills(&tokens("terraform terraform terraform sql"), &v, &mode);
        assert_eq!(skills, set(&["SQL", "terraform"]));
    }

    #[test]
    fn test_extract_pair_hybrid_reports_free_form_job_terms() {
        let extractor = SkillExtractor::new(
            vocab(&["Python"]),
            NormalizerConfig::default(),
            ExtractionMode::Hybrid {
                top_k: 1,
                max_ngram: 1,
            },
        );
        let resume = extractor.tokenize("python python");
        let job = extractor.tokenize("python tableau");
        let (resume_skills, job_skills) = extractor.extract_pair(&resume, &job);
        assert_eq!(resume_skills, set(&["Python"]));
        assert_eq!(job_skills, set(&["Python", "tableau"]));
    }

    #[test]
    fn test_tfidf_cannot_detect_labels_longer_than_max_ngram() {
        let extractor = SkillExtractor::new(
            vocab(&["Amazon Web Services", "Power BI"]),
            NormalizerConfig::default(),
            ExtractionMode::TfIdf {
                top_k: 10,
                max_ngram: 2,
            },
        );
        assert_eq!(extractor.undetectable_labels(), vec!["Amazon Web Services"]);

        let text = extractor.tokenize("amazon web services and power bi");
        assert_eq!(extractor.extract(&text), set(&["Power BI"]));
    }

    #[test]
    fn test_vocabulary_mode_has_no_undetectable_labels() {
        let extractor = SkillExtractor::new(
            vocab(&["Amazon Web Services"]),
            NormalizerConfig::default(),
            ExtractionMode::Vocabulary,
        );
        assert!(extractor.undetectable_labels().is_empty());
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let mode = ExtractionMode::Hybrid {
            top_k: 4,
            max_ngram: 2,
        };
        let v = vocab(&["Python", "SQL"]);
        let text = tokens("python etl airflow sql python dbt snowflake airflow");
        let first = extract_skills(&text, &v, &mode);
        for _ in 0..5 {
            assert_eq!(extract_skills(&text, &v, &mode), first);
        }
    }

    #[test]
    fn test_skill_set_iterates_sorted() {
        let s = set(&["SQL", "Python", "AWS"]);
        let labels: Vec<&String> = s.iter().collect();
        assert_eq!(labels, vec!["AWS", "Python", "SQL"]);
    }

    #[test]
    fn test_extract_pair_tfidf_weighs_against_both_documents() {
        let extractor = SkillExtractor::new(
            SkillVocabulary::default(),
            NormalizerConfig::default(),
            ExtractionMode::TfIdf {
                top_k: 1,
                max_ngram: 1,
            },
        );
        // "python" appears in both documents, so the job's unique term wins.
        let resume = extractor.tokenize("python python");
        let job = extractor.tokenize("python tableau");
        let (_, job_skills) = extractor.extract_pair(&resume, &job);
        assert_eq!(job_skills, set(&["tableau"]));
    }

    #[test]
    fn test_extract_pair_vocabulary_matches_single_extraction() {
        let extractor = SkillExtractor::new(
            vocab(&["Python", "SQL", "Power BI"]),
            NormalizerConfig::default(),
            ExtractionMode::Vocabulary,
        );
        let resume = extractor.tokenize("I know Python and SQL");
        let job = extractor.tokenize("Requires Python, SQL, and Power BI");
        let (r, j) = extractor.extract_pair(&resume, &job);
        assert_eq!(r, extractor.extract(&resume));
        assert_eq!(j, extractor.extract(&job));
    }
}
