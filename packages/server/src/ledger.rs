//! Durable record of submissions and their judging outcomes.
//!
//! A submission is inserted as `Pending` and leaves that state exactly once.
//! Every transition goes through a conditional update on `status = 'Pending'`,
//! so two writers racing on the same row cannot both succeed.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use tracing::{info, instrument, warn};
use uzcode_common::{AnalysisResult, SubmissionStatus};

use crate::entity::submission::{DEFAULT_LANGUAGE, EMPTY_ANALYSIS};
use crate::entity::{problem, submission};
use crate::error::AppError;

/// Find a cached problem by slug or return 404 naming it.
pub async fn find_problem<C: ConnectionTrait>(db: &C, slug: &str) -> Result<problem::Model, AppError> {
    problem::Entity::find()
        .filter(problem::Column::Slug.eq(slug))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Problem '{slug}' not found in cache.")))
}

/// Insert a `Pending` submission for a problem known to the catalog.
#[instrument(skip(db, code), fields(code_len = code.len()))]
pub async fn create<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    problem_slug: &str,
    code: &str,
) -> Result<submission::Model, AppError> {
    find_problem(db, problem_slug).await?;

    let model = submission::ActiveModel {
        user_id: Set(user_id),
        problem_slug: Set(problem_slug.to_string()),
        code: Set(code.to_string()),
        language: Set(DEFAULT_LANGUAGE.to_string()),
        status: Set(SubmissionStatus::Pending.to_string()),
        analysis: Set(EMPTY_ANALYSIS.to_string()),
        submitted_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(submission_id = model.id, "Submission recorded as Pending");
    Ok(model)
}

/// Record the judging outcome of a `Pending` submission.
///
/// This is the only mutation allowed after creation. `status` must be
/// terminal; the analysis is stored verbatim.
#[instrument(skip(db, analysis), fields(status = %status))]
pub async fn record_outcome<C: ConnectionTrait>(
    db: &C,
    submission_id: i32,
    status: SubmissionStatus,
    analysis: &AnalysisResult,
) -> Result<(), AppError> {
    if !status.is_terminal() {
        return Err(AppError::Internal(format!(
            "Refusing to record non-terminal status for submission {submission_id}"
        )));
    }

    let payload = serde_json::to_string(analysis)
        .map_err(|e| AppError::Internal(format!("Analysis serialization error: {e}")))?;

    let result = submission::Entity::update_many()
        .col_expr(submission::Column::Status, Expr::value(status.to_string()))
        .col_expr(submission::Column::Analysis, Expr::value(payload))
        .filter(submission::Column::Id.eq(submission_id))
        .filter(submission::Column::Status.eq(SubmissionStatus::PENDING))
        .exec(db)
        .await?;

    ensure_transitioned(db, submission_id, result.rows_affected).await?;

    info!(submission_id, status = %status, "Submission outcome recorded");
    Ok(())
}

/// Mark a still-`Pending` submission as `System Error`.
///
/// Used when the server fails after the row was created; the analysis
/// payload is left untouched.
#[instrument(skip(db))]
pub async fn mark_system_error<C: ConnectionTrait>(
    db: &C,
    submission_id: i32,
) -> Result<(), AppError> {
    let result = submission::Entity::update_many()
        .col_expr(
            submission::Column::Status,
            Expr::value(SubmissionStatus::SystemError.to_string()),
        )
        .filter(submission::Column::Id.eq(submission_id))
        .filter(submission::Column::Status.eq(SubmissionStatus::PENDING))
        .exec(db)
        .await?;

    ensure_transitioned(db, submission_id, result.rows_affected).await?;

    warn!(submission_id, "Submission marked as System Error");
    Ok(())
}

async fn ensure_transitioned<C: ConnectionTrait>(
    db: &C,
    submission_id: i32,
    rows_affected: u64,
) -> Result<(), AppError> {
    if rows_affected > 0 {
        return Ok(());
    }
    let existing = get_by_id(db, submission_id).await?;
    Err(AppError::Conflict(format!(
        "Submission {submission_id} is already {}",
        existing.status
    )))
}

/// Point lookup by id.
pub async fn get_by_id<C: ConnectionTrait>(
    db: &C,
    submission_id: i32,
) -> Result<submission::Model, AppError> {
    submission::Entity::find_by_id(submission_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Submission not found.".into()))
}

/// Most recent submissions of a user, newest first.
pub async fn list_recent_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    limit: u64,
) -> Result<Vec<submission::Model>, AppError> {
    let rows = submission::Entity::find()
        .filter(submission::Column::UserId.eq(user_id))
        .order_by_desc(submission::Column::SubmittedAt)
        .order_by_desc(submission::Column::Id)
        .limit(Some(limit))
        .all(db)
        .await?;
    Ok(rows)
}

/// Total number of submissions made by a user.
pub async fn count_for_user<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<u64, AppError> {
    let count = submission::Entity::find()
        .filter(submission::Column::UserId.eq(user_id))
        .count(db)
        .await?;
    Ok(count)
}

/// Distinct problem slugs a user has a solving verdict for.
pub async fn solved_slugs_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    solved_verdicts: &[String],
) -> Result<Vec<String>, AppError> {
    solved_slugs(db, Some(user_id), solved_verdicts).await
}

/// Distinct problem slugs anyone has a solving verdict for.
pub async fn solved_slugs_by_anyone<C: ConnectionTrait>(
    db: &C,
    solved_verdicts: &[String],
) -> Result<Vec<String>, AppError> {
    solved_slugs(db, None, solved_verdicts).await
}

async fn solved_slugs<C: ConnectionTrait>(
    db: &C,
    user_id: Option<i32>,
    solved_verdicts: &[String],
) -> Result<Vec<String>, AppError> {
    let slugs: Vec<String> = submission::Entity::find()
        .select_only()
        .column(submission::Column::ProblemSlug)
        .distinct()
        .apply_if(user_id, |q, id| q.filter(submission::Column::UserId.eq(id)))
        .filter(submission::Column::Status.is_in(solved_verdicts.iter().cloned()))
        .into_tuple()
        .all(db)
        .await?;
    Ok(slugs)
}
