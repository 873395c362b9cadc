//! Analyzer: extraction → prompt → model → interpretation for one résumé.
//!
//! The caller owns the history of past results: every call returns a fresh
//! `AnalysisRecord` and nothing is kept here between calls.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::interpreter::{format_percentage, interpret, AnalysisResult, MatchBand};
use crate::analysis::prompts::{build_analysis_prompt, build_improvement_prompt};
use crate::errors::AppError;
use crate::extraction::{extract, Document};
use crate::llm_client::LanguageModel;

/// One analysed résumé. This is what callers keep and send back for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub filename: String,
    pub analysis: AnalysisResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub improvement_suggestions: Option<String>,
}

impl AnalysisRecord {
    pub fn match_percentage(&self) -> Option<f64> {
        self.analysis.as_structured().map(|r| r.match_percentage())
    }

    pub fn match_band(&self) -> Option<MatchBand> {
        self.analysis.as_structured().map(|r| r.band())
    }
}

/// Inputs for a single analysis once the résumé text is in hand.
#[derive(Debug, Clone)]
pub struct AnalyzeRequest<'a> {
    pub filename: &'a str,
    pub resume_text: &'a str,
    pub job_description: &'a str,
    pub include_suggestions: bool,
}

/// Scores one résumé against the job description.
///
/// An undecodable model reply is not an error: it comes back as a fallback
/// record. Suggestions are only requested for structured results.
pub async fn analyze_resume(
    llm: &dyn LanguageModel,
    request: AnalyzeRequest<'_>,
) -> Result<AnalysisRecord, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }
    if request.resume_text.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(format!(
            "Could not extract any text from '{}'",
            request.filename
        )));
    }

    let prompt = build_analysis_prompt(request.resume_text, request.job_description);
    let reply = llm.generate(&prompt).await?;
    let analysis = interpret(&reply);

    let improvement_suggestions = match &analysis {
        AnalysisResult::Structured(report) => {
            info!(
                "Analysed '{}': match {}, {} missing keywords",
                request.filename,
                format_percentage(report.match_percentage()),
                report.missing_keywords.len()
            );
            if request.include_suggestions {
                let prompt =
                    build_improvement_prompt(request.resume_text, request.job_description);
                Some(llm.generate(&prompt).await?)
            } else {
                None
            }
        }
        AnalysisResult::Fallback(_) => {
            warn!(
                "Could not parse the model reply for '{}', returning raw response",
                request.filename
            );
            None
        }
    };

    Ok(AnalysisRecord {
        filename: request.filename.to_string(),
        analysis,
        improvement_suggestions,
    })
}

/// Extracts the uploaded document on the blocking pool, then analyses it.
pub async fn analyze_upload(
    llm: &dyn LanguageModel,
    filename: &str,
    document: Document,
    job_description: &str,
    include_suggestions: bool,
) -> Result<AnalysisRecord, AppError> {
    let text = tokio::task::spawn_blocking(move || extract(&document))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task failed: {e}")))??;
    if text.is_blank() {
        warn!("'{filename}' parsed but contains no extractable text");
    }

    analyze_resume(
        llm,
        AnalyzeRequest {
            filename,
            resume_text: text.as_str(),
            job_description,
            include_suggestions,
        },
    )
    .await
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::llm_client::{LanguageModel, LlmError};

    /// Replays canned replies in order and records every prompt it was sent.
    #[derive(Default)]
    pub struct ScriptedModel {
        replies: Mutex<VecDeque<Result<String, LlmError>>>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        pub fn new(replies: Vec<Result<String, LlmError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn replying(replies: &[&str]) -> Self {
            Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
        }

        pub fn prompt_count(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(LlmError::EmptyContent))
        }
    }
}
