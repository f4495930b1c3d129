use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uzcode_common::AnalysisResult;

use crate::entity::submission;
use crate::error::AppError;

/// Request body shared by the submission and standalone judge endpoints.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SubmitCodeRequest {
    /// Python source code.
    #[schema(example = "class Solution:\n    def twoSum(self, nums, target):\n        ...")]
    pub code: String,
    /// Problem slug.
    #[schema(example = "two-sum")]
    pub problem: String,
}

pub fn validate_submit_request(req: &SubmitCodeRequest, max_size: usize) -> Result<(), AppError> {
    if req.problem.trim().is_empty() {
        return Err(AppError::Validation("Problem slug must not be empty".into()));
    }
    if req.code.trim().is_empty() {
        return Err(AppError::Validation("Code must not be empty".into()));
    }
    if req.code.len() > max_size {
        return Err(AppError::Validation(format!(
            "Code exceeds maximum size of {max_size} bytes"
        )));
    }
    Ok(())
}

/// Outcome of a judged submission.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SubmissionResultResponse {
    #[schema(example = "Submission processed successfully.")]
    pub message: String,
    #[schema(example = 17)]
    pub submission_id: i32,
    /// Final stored status (the judge's verdict).
    #[schema(example = "Accepted")]
    pub status: String,
    pub analysis: AnalysisResult,
}

/// A stored submission.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SubmissionResponse {
    #[schema(example = 17)]
    pub id: i32,
    #[schema(example = "two-sum")]
    pub problem_slug: String,
    /// `Pending`, `Failed`, `System Error` or the judge's verdict.
    #[schema(example = "Accepted")]
    pub status: String,
    pub code: String,
    #[schema(example = "Python")]
    pub language: String,
    pub created_at: DateTime<Utc>,
    /// Stored analysis; `{}` before judging completes.
    #[schema(value_type = Object)]
    pub analysis: serde_json::Value,
}

impl From<submission::Model> for SubmissionResponse {
    fn from(model: submission::Model) -> Self {
        let analysis = model.analysis_json();
        Self {
            id: model.id,
            problem_slug: model.problem_slug,
            status: model.status,
            code: model.code,
            language: model.language,
            created_at: model.submitted_at,
            analysis,
        }
    }
}

/// Standalone judge outcome.
#[derive(Serialize, utoipa::ToSchema)]
pub struct JudgeResponse {
    /// Always `Processed`.
    #[schema(example = "Processed")]
    pub submission_status: &'static str,
    pub analysis: AnalysisResult,
}
