//! Analysis pipeline: text extraction, normalization, skill extraction,
//! gap analysis and the learning plan.
//!
//! Extraction and recommendation failures never abort an analysis: they
//! degrade to empty text / empty course lists and are reported in `warnings`.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::analysis::gap::{analyze_gap, summarize, text_similarity, GapResult};
use crate::analysis::skills::{SkillExtractor, SkillSet};
use crate::extraction::{Document, TextExtractor};
use crate::recommend::{CourseReference, ResourceRecommender};

// ────────────────────────────────────────────────────────────────────────────
// Report models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct LearningPlanItem {
    pub skill: String,
    pub courses: Vec<CourseReference>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub resume_skills: SkillSet,
    pub job_skills: SkillSet,
    /// Skill coverage: matched / missing / match_score.
    pub gap: GapResult,
    pub summary: String,
    /// Document-level TF-IDF cosine. Not a skill metric.
    pub text_similarity: f64,
    pub learning_plan: Vec<LearningPlanItem>,
    pub recommender: String,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub name: String,
    pub report: AnalysisReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub job_name: String,
    pub results: Vec<BatchEntry>,
}

/// Per-request memo so a batch asks the recommender once per skill.
type CourseCache = BTreeMap<String, Vec<CourseReference>>;

// ────────────────────────────────────────────────────────────────────────────
// Analyzer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct Analyzer {
    extractor: Arc<dyn TextExtractor>,
    skills: Arc<SkillExtractor>,
    recommender: Arc<dyn ResourceRecommender>,
}

impl Analyzer {
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        skills: Arc<SkillExtractor>,
        recommender: Arc<dyn ResourceRecommender>,
    ) -> Self {
        Self {
            extractor,
            skills,
            recommender,
        }
    }

    pub fn skill_extractor(&self) -> &SkillExtractor {
        &self.skills
    }

    /// Full analysis of one resume against one job description.
    pub async fn analyze(&self, resume: Document, job: Document) -> AnalysisReport {
        let mut warnings = Vec::new();
        let resume_text = self.extract_text(resume, &mut warnings).await;
        let job_text = self.extract_text(job, &mut warnings).await;

        let mut cache = CourseCache::new();
        self.analyze_extracted(&resume_text, &job_text, warnings, &mut cache)
            .await
    }

    /// Same as `analyze`, for callers that already hold plain text.
    pub async fn analyze_texts(&self, resume_text: &str, job_text: &str) -> AnalysisReport {
        let mut cache = CourseCache::new();
        self.analyze_extracted(resume_text, job_text, Vec::new(), &mut cache)
            .await
    }

    /// One job description against many resumes. A resume that fails to
    /// extract still gets a report (with empty skills and a warning).
    pub async fn analyze_batch(&self, job: Document, resumes: Vec<Document>) -> BatchReport {
        let job_name = job.name.clone();
        let mut job_warnings = Vec::new();
        let job_text = self.extract_text(job, &mut job_warnings).await;

        let mut cache = CourseCache::new();
        let mut results = Vec::with_capacity(resumes.len());

        for resume in resumes {
            let name = resume.name.clone();
            let mut warnings = job_warnings.clone();
            let resume_text = self.extract_text(resume, &mut warnings).await;
            let report = self
                .analyze_extracted(&resume_text, &job_text, warnings, &mut cache)
                .await;
            results.push(BatchEntry { name, report });
        }

        info!(
            "Batch analysis of '{job_name}' finished: {} resumes",
            results.len()
        );
        BatchReport { job_name, results }
    }

    async fn analyze_extracted(
        &self,
        resume_text: &str,
        job_text: &str,
        mut warnings: Vec<String>,
        cache: &mut CourseCache,
    ) -> AnalysisReport {
        let resume_tokens = self.skills.tokenize(resume_text);
        let job_tokens = self.skills.tokenize(job_text);

        let (resume_skills, job_skills) = self.skills.extract_pair(&resume_tokens, &job_tokens);
        let gap = analyze_gap(&resume_skills, &job_skills);
        let similarity = text_similarity(&resume_tokens, &job_tokens);

        if job_skills.is_empty() {
            warnings.push(
                "No skills detected in the job description; match_score defaults to 1.0"
                    .to_string(),
            );
        }

        let learning_plan = self
            .learning_plan(&gap.missing_skills, &mut warnings, cache)
            .await;

        info!(
            resume_skills = resume_skills.len(),
            job_skills = job_skills.len(),
            missing = gap.missing_skills.len(),
            match_score = gap.match_score,
            text_similarity = similarity,
            "Skill gap analysis complete"
        );

        let summary = summarize(&gap);

        AnalysisReport {
            resume_skills,
            job_skills,
            summary,
            gap,
            text_similarity: similarity,
            learning_plan,
            recommender: self.recommender.name().to_string(),
            warnings,
        }
    }

    /// Runs the blocking extractor on the blocking pool. Any failure yields
    /// empty text and a warning.
    async fn extract_text(&self, document: Document, warnings: &mut Vec<String>) -> String {
        let extractor = Arc::clone(&self.extractor);
        let name = document.name.clone();

        let outcome = tokio::task::spawn_blocking(move || {
            extractor.extract(&document.content, &document.format)
        })
        .await;

        match outcome {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!("Text extraction failed for '{name}': {e}");
                warnings.push(format!("{name}: {e}"));
                String::new()
            }
            Err(e) => {
                warn!("Text extraction task for '{name}' did not complete: {e}");
                warnings.push(format!("{name}: extraction aborted"));
                String::new()
            }
        }
    }

    async fn learning_plan(
        &self,
        missing: &SkillSet,
        warnings: &mut Vec<String>,
        cache: &mut CourseCache,
    ) -> Vec<LearningPlanItem> {
        let mut plan = Vec::with_capacity(missing.len());

        for skill in missing {
            let courses = match cache.get(skill) {
                Some(courses) => courses.clone(),
                None => {
                    let courses = match self.recommender.recommend(skill).await {
                        Ok(courses) => courses,
                        Err(e) => {
                            warn!("Course recommendation failed for '{skill}': {e}");
                            warnings.push(format!("No courses for '{skill}': {e}"));
                            Vec::new()
                        }
                    };
                    cache.insert(skill.clone(), courses.clone());
                    courses
                }
            };
            plan.push(LearningPlanItem {
                skill: skill.clone(),
                courses,
            });
        }

        plan
    }
}
