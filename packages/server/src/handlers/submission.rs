use axum::Json;
use axum::extract::{Path, State};
use tracing::{Instrument, error, info, instrument, warn};
use uzcode_common::{AnalysisResult, SubmissionStatus};

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::judge::prompt;
use crate::ledger;
use crate::models::submission::*;
use crate::state::AppState;

const SUCCESS_MESSAGE: &str = "Submission processed successfully.";

/// How a judging round ended, before it is written to the ledger.
enum Verdict {
    Judged(AnalysisResult),
    Failed {
        analysis: AnalysisResult,
        credential_error: bool,
    },
}

#[utoipa::path(
    post,
    path = "/api/v1/submissions",
    tag = "Submissions",
    operation_id = "createSubmission",
    summary = "Submit a solution and judge it",
    description = "Records the submission as `Pending`, asks the AI judge for an analysis, stores the outcome and returns it. The submission never stays `Pending` once this call returns.",
    request_body = SubmitCodeRequest,
    responses(
        (status = 200, description = "Submission judged", body = SubmissionResultResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, UNKNOWN_CALLER) or judge rejected the API key (JUDGE_UNAUTHORIZED)", body = ErrorBody),
        (status = 404, description = "Problem not cached (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Judge failed (JUDGE_FAILED) or outcome could not be stored (INTERNAL_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, problem = %payload.problem))]
pub async fn create_submission(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<SubmitCodeRequest>,
) -> Result<Json<SubmissionResultResponse>, AppError> {
    validate_submit_request(&payload, state.config.submission.max_code_size)?;

    let slug = payload.problem.trim();
    let problem = ledger::find_problem(&state.db, slug).await?;
    let submission = ledger::create(&state.db, auth_user.user_id, slug, &payload.code).await?;

    let description = prompt::problem_description(
        &problem.title,
        &problem.difficulty,
        problem.content.as_deref(),
    );

    // Judging and recording run as their own task so a dropped connection
    // cannot leave the row Pending.
    let submission_id = submission.id;
    let task = tokio::spawn(
        judge_and_record(state.clone(), submission_id, payload.code, description)
            .in_current_span(),
    );

    match task.await {
        Ok(result) => result,
        Err(join_err) => {
            error!(submission_id, error = %join_err, "Judging task aborted");
            mark_system_error(&state, submission_id).await;
            Err(AppError::Internal(format!(
                "Judging task for submission {submission_id} aborted: {join_err}"
            )))
        }
    }
}

async fn judge_and_record(
    state: AppState,
    submission_id: i32,
    code: String,
    description: String,
) -> Result<Json<SubmissionResultResponse>, AppError> {
    let verdict = match state.judge.judge(&code, &description).await {
        Ok(analysis) if !analysis.is_sentinel() => Verdict::Judged(analysis),
        Ok(analysis) => Verdict::Failed {
            analysis,
            credential_error: false,
        },
        Err(failure) => Verdict::Failed {
            credential_error: failure.is_credential_error(),
            analysis: failure.into_analysis(),
        },
    };

    let (status, analysis) = match &verdict {
        Verdict::Judged(analysis) => (SubmissionStatus::verdict(&analysis.status), analysis),
        Verdict::Failed { analysis, .. } => (SubmissionStatus::Failed, analysis),
    };

    if let Err(e) = ledger::record_outcome(&state.db, submission_id, status.clone(), analysis).await
    {
        error!(submission_id, error = ?e, "Failed to record judging outcome");
        mark_system_error(&state, submission_id).await;
        return Err(AppError::Internal(format!(
            "Could not record outcome of submission {submission_id}: {e:?}"
        )));
    }

    match verdict {
        Verdict::Judged(analysis) => {
            info!(submission_id, status = %status, "Submission judged");
            Ok(Json(SubmissionResultResponse {
                message: SUCCESS_MESSAGE.to_string(),
                submission_id,
                status: status.to_string(),
                analysis,
            }))
        }
        Verdict::Failed {
            analysis,
            credential_error,
        } => {
            warn!(submission_id, judge_status = %analysis.status, "Judge failed, submission marked Failed");
            if credential_error {
                Err(AppError::JudgeUnauthorized(analysis.critique))
            } else {
                Err(AppError::JudgeFailed(analysis.critique))
            }
        }
    }
}

async fn mark_system_error(state: &AppState, submission_id: i32) {
    if let Err(e) = ledger::mark_system_error(&state.db, submission_id).await {
        error!(submission_id, error = ?e, "Failed to mark submission as System Error");
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/submissions/{id}",
    tag = "Submissions",
    operation_id = "getSubmission",
    summary = "Get a submission",
    description = "Returns one of the caller's submissions with its stored analysis. Submissions of other users are reported as not found.",
    params(
        ("id" = i32, Path, description = "Submission ID")
    ),
    responses(
        (status = 200, description = "Submission details", body = SubmissionResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, UNKNOWN_CALLER)", body = ErrorBody),
        (status = 404, description = "Submission not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn get_submission(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SubmissionResponse>, AppError> {
    let submission = ledger::get_by_id(&state.db, id).await?;
    if submission.user_id != auth_user.user_id {
        return Err(AppError::NotFound("Submission not found.".into()));
    }
    Ok(Json(SubmissionResponse::from(submission)))
}
