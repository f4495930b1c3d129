use axum::Json;
use axum::extract::State;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::judge::prompt;
use crate::models::submission::{JudgeResponse, SubmitCodeRequest, validate_submit_request};
use crate::state::AppState;

/// Judge code against a problem slug without recording anything.
#[utoipa::path(
    post,
    path = "/api/v1/judge",
    tag = "Judge",
    operation_id = "judgeCode",
    summary = "Dry-run the AI judge",
    description = "Asks the judge for an analysis of the code using only the problem slug as context. Nothing is stored and the problem does not need to be cached.",
    request_body = SubmitCodeRequest,
    responses(
        (status = 200, description = "Analysis produced", body = JudgeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Judge failed (JUDGE_FAILED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(problem = %payload.problem))]
pub async fn judge_code(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SubmitCodeRequest>,
) -> Result<Json<JudgeResponse>, AppError> {
    validate_submit_request(&payload, state.config.submission.max_code_size)?;

    let description = prompt::slug_description(payload.problem.trim());
    let analysis = match state.judge.judge(&payload.code, &description).await {
        Ok(analysis) if !analysis.is_sentinel() => analysis,
        Ok(analysis) => return Err(AppError::JudgeFailed(analysis.critique)),
        Err(failure) => return Err(AppError::JudgeFailed(failure.into_analysis().critique)),
    };

    Ok(Json(JudgeResponse {
        submission_status: "Processed",
        analysis,
    }))
}
