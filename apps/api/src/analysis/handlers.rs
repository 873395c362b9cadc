//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Multipart, State},
    http::header,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::analyzer::{analyze_upload, AnalysisRecord};
use crate::analysis::export::{
    export_csv, export_json, CSV_EXPORT_FILENAME, JSON_EXPORT_FILENAME,
};
use crate::analysis::interpreter::MatchBand;
use crate::errors::AppError;
use crate::extraction::Document;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub record: AnalysisRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_band: Option<MatchBand>,
}

impl From<AnalysisRecord> for AnalyzeResponse {
    fn from(record: AnalysisRecord) -> Self {
        Self {
            match_percentage: record.match_percentage(),
            match_band: record.match_band(),
            record,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BatchFailure {
    pub filename: String,
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct BatchAnalyzeResponse {
    pub results: Vec<AnalyzeResponse>,
    pub failures: Vec<BatchFailure>,
}

/// Past results held by the caller, sent back for export.
#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub records: Vec<AnalysisRecord>,
}

/// A parsed `multipart/form-data` analysis request.
#[derive(Debug, Default)]
struct AnalysisForm {
    job_description: String,
    include_suggestions: bool,
    resumes: Vec<UploadedResume>,
}

#[derive(Debug)]
struct UploadedResume {
    filename: String,
    bytes: Bytes,
}

async fn read_analysis_form(mut multipart: Multipart) -> Result<AnalysisForm, AppError> {
    let mut form = AnalysisForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "job_description" => form.job_description = field.text().await?,
            "include_suggestions" => {
                let value = field.text().await?;
                form.include_suggestions = parse_flag(&value).ok_or_else(|| {
                    AppError::Validation(format!(
                        "include_suggestions must be true or false, got '{value}'"
                    ))
                })?;
            }
            "resume" => {
                let filename = field
                    .file_name()
                    .map(str::to_owned)
                    .ok_or_else(|| {
                        AppError::Validation("resume field must carry a file name".to_string())
                    })?;
                let bytes = field.bytes().await?;
                form.resumes.push(UploadedResume { filename, bytes });
            }
            other => warn!("Ignoring unknown multipart field '{other}'"),
        }
    }

    if form.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }
    if form.resumes.is_empty() {
        return Err(AppError::Validation(
            "at least one resume file is required".to_string(),
        ));
    }
    Ok(form)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Analyses exactly one résumé against the job description.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let form = read_analysis_form(multipart).await?;
    if form.resumes.len() > 1 {
        return Err(AppError::Validation(
            "use /api/v1/analyze/batch for more than one resume".to_string(),
        ));
    }
    let Some(resume) = form.resumes.into_iter().next() else {
        return Err(AppError::Validation("a resume file is required".to_string()));
    };

    let document = Document::from_upload(&resume.filename, resume.bytes);
    let record = analyze_upload(
        state.llm.as_ref(),
        &resume.filename,
        document,
        &form.job_description,
        form.include_suggestions,
    )
    .await?;

    Ok(Json(record.into()))
}

/// POST /api/v1/analyze/batch
///
/// Analyses every uploaded résumé in order. Files that cannot be read are
/// reported in `failures`; a model failure aborts the whole batch.
pub async fn handle_analyze_batch(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<BatchAnalyzeResponse>, AppError> {
    let form = read_analysis_form(multipart).await?;
    let total = form.resumes.len();
    info!("Batch analysis of {total} resumes");

    let mut results: Vec<AnalyzeResponse> = Vec::with_capacity(total);
    let mut failures = Vec::new();

    for resume in form.resumes {
        let document = Document::from_upload(&resume.filename, resume.bytes);
        let outcome = analyze_upload(
            state.llm.as_ref(),
            &resume.filename,
            document,
            &form.job_description,
            form.include_suggestions,
        )
        .await;

        match outcome {
            Ok(record) => results.push(record.into()),
            Err(
                err @ (AppError::UnsupportedFormat(_)
                | AppError::CorruptDocument { .. }
                | AppError::UnprocessableEntity(_)),
            ) => {
                warn!("Skipping '{}': {err}", resume.filename);
                failures.push(BatchFailure {
                    filename: resume.filename,
                    code: err.code(),
                    message: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }
    }

    info!(
        "Batch finished: {} analysed, {} failed",
        results.len(),
        failures.len()
    );
    Ok(Json(BatchAnalyzeResponse { results, failures }))
}

/// POST /api/v1/export/json
pub async fn handle_export_json(
    Json(req): Json<ExportRequest>,
) -> Result<impl IntoResponse, AppError> {
    let body = export_json(&req.records)?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{JSON_EXPORT_FILENAME}\""),
            ),
        ],
        body,
    ))
}

/// POST /api/v1/export/csv
pub async fn handle_export_csv(
    Json(req): Json<ExportRequest>,
) -> Result<impl IntoResponse, AppError> {
    let body = export_csv(&req.records)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{CSV_EXPORT_FILENAME}\""),
            ),
        ],
        body,
    ))
}
