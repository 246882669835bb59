//! Gap Analyzer: compares resume skills against job skills.
//!
//! Two separate metrics:
//! - `match_score`: fraction of the job's skills found in the resume.
//! - `text_similarity`: TF-IDF cosine over the full documents.

use serde::{Deserialize, Serialize};

use crate::analysis::skills::SkillSet;
use crate::analysis::tfidf::{cosine_similarity, TfIdfModel};

/// Score reported when the job lists no recognisable skills. A job with no
/// requirements is treated as fully covered by any resume.
pub const VACUOUS_MATCH_SCORE: f64 = 1.0;

/// N-gram width used for document-level similarity.
const SIMILARITY_MAX_NGRAM: usize = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapResult {
    pub matched_skills: SkillSet,
    pub missing_skills: SkillSet,
    /// Always within [0, 1].
    pub match_score: f64,
}

/// `matched = resume ∩ job`, `missing = job − resume`,
/// `match_score = |matched| / |job|` (or `VACUOUS_MATCH_SCORE` for an empty job).
pub fn analyze_gap(resume_skills: &SkillSet, job_skills: &SkillSet) -> GapResult {
    let matched_skills = job_skills.intersection(resume_skills);
    let missing_skills = job_skills.difference(resume_skills);

    let match_score = if job_skills.is_empty() {
        VACUOUS_MATCH_SCORE
    } else {
        matched_skills.len() as f64 / job_skills.len() as f64
    };

    GapResult {
        matched_skills,
        missing_skills,
        match_score,
    }
}

/// Human-readable verdict for a gap result, naming up to three missing skills.
pub fn summarize(gap: &GapResult) -> String {
    let percent = (gap.match_score * 100.0).round() as u32;
    let top_missing: Vec<&str> = gap
        .missing_skills
        .iter()
        .take(3)
        .map(String::as_str)
        .collect();

    if top_missing.is_empty() {
        "Strong fit. The resume covers every skill detected in the job description.".to_string()
    } else if percent >= 80 {
        format!(
            "Strong fit ({percent}/100). Remaining gaps: {}.",
            top_missing.join(", ")
        )
    } else if percent >= 60 {
        format!(
            "Moderate fit ({percent}/100). Consider learning: {}.",
            top_missing.join(", ")
        )
    } else {
        format!(
            "Low fit ({percent}/100). Significant gaps: {}. See the learning plan.",
            top_missing.join(", ")
        )
    }
}

/// TF-IDF cosine similarity of the two token streams, fitted over the pair.
/// Zero when either side is empty.
pub fn text_similarity(resume_tokens: &[String], job_tokens: &[String]) -> f64 {
    if resume_tokens.is_empty() || job_tokens.is_empty() {
        return 0.0;
    }
    let model = TfIdfModel::fit(&[resume_tokens, job_tokens], SIMILARITY_MAX_NGRAM);
    cosine_similarity(&model.vector(0), &model.vector(1))
}
