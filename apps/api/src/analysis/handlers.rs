//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::pipeline::{AnalysisReport, BatchReport};
use crate::analysis::skills::ExtractionMode;
use crate::errors::AppError;
use crate::extraction::Document;
use crate::state::AppState;

const RESUME_FIELD: &str = "resume";
const JOB_FIELD: &str = "job_desc";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    pub resume_text: String,
    pub job_text: String,
}

#[derive(Debug, Serialize)]
pub struct VocabularyResponse {
    pub skills: Vec<String>,
    pub mode: ExtractionMode,
    pub max_courses_per_skill: usize,
}

/// Uploaded files grouped by form field.
#[derive(Default)]
struct Uploads {
    resumes: Vec<Document>,
    job: Option<Document>,
}

async fn read_uploads(mut multipart: Multipart) -> Result<Uploads, AppError> {
    let mut uploads = Uploads::default();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;

        let document = Document::from_upload(file_name.as_deref(), content_type.as_deref(), bytes);

        match field_name.as_str() {
            RESUME_FIELD => uploads.resumes.push(document),
            JOB_FIELD => {
                if uploads.job.replace(document).is_some() {
                    return Err(AppError::Validation(format!(
                        "only one '{JOB_FIELD}' file may be uploaded"
                    )));
                }
            }
            other => {
                info!("Ignoring unexpected multipart field '{other}'");
            }
        }
    }

    Ok(uploads)
}

fn require_job(job: Option<Document>) -> Result<Document, AppError> {
    job.ok_or_else(|| AppError::Validation(format!("missing '{JOB_FIELD}' file")))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Multipart upload of one `resume` and one `job_desc` file (.txt, .pdf or .docx).
/// Returns matched/missing skills, both scores and a learning plan.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisReport>, AppError> {
    let uploads = read_uploads(multipart).await?;
    let job = require_job(uploads.job)?;

    let mut resumes = uploads.resumes.into_iter();
    let resume = match (resumes.next(), resumes.next()) {
        (Some(resume), None) => resume,
        (None, _) => {
            return Err(AppError::Validation(format!("missing '{RESUME_FIELD}' file")));
        }
        (Some(_), Some(_)) => {
            return Err(AppError::Validation(
                "multiple resumes uploaded; use /api/v1/analyze/batch".to_string(),
            ));
        }
    };

    let report = state.analyzer.analyze(resume, job).await;
    Ok(Json(report))
}

/// POST /api/v1/analyze/text
///
/// Same analysis over plain text. Empty texts are valid input.
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalysisReport>, AppError> {
    let report = state
        .analyzer
        .analyze_texts(&request.resume_text, &request.job_text)
        .await;
    Ok(Json(report))
}

/// POST /api/v1/analyze/batch
///
/// One `job_desc` file against any number of `resume` files. Individual
/// resume failures are reported per entry and never fail the batch.
pub async fn handle_analyze_batch(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<BatchReport>, AppError> {
    let uploads = read_uploads(multipart).await?;
    let job = require_job(uploads.job)?;

    if uploads.resumes.is_empty() {
        return Err(AppError::Validation(format!(
            "at least one '{RESUME_FIELD}' file is required"
        )));
    }

    let report = state.analyzer.analyze_batch(job, uploads.resumes).await;
    Ok(Json(report))
}

/// GET /api/v1/vocabulary
pub async fn handle_vocabulary(State(state): State<AppState>) -> Json<VocabularyResponse> {
    let extractor = state.analyzer.skill_extractor();
    Json(VocabularyResponse {
        skills: extractor
            .vocabulary()
            .labels()
            .into_iter()
            .map(String::from)
            .collect(),
        mode: *extractor.mode(),
        max_courses_per_skill: state.config.max_courses_per_skill,
    })
}
