use axum::Json;
use axum::extract::State;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{problem, submission, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AdminAccess;
use crate::ledger;
use crate::models::stats::AdminStatsResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/admin/stats",
    tag = "Admin",
    operation_id = "adminStats",
    summary = "Platform statistics",
    description = "Totals across all users. Requires the admin token.",
    params(("admin_token" = Option<String>, Query, description = "Admin token, if not sent as `X-Admin-Token`")),
    responses(
        (status = 200, description = "Platform statistics", body = AdminStatsResponse),
        (status = 401, description = "Missing or wrong admin token (TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("admin_token" = [])),
)]
#[instrument(skip(state, _admin))]
pub async fn admin_stats(
    _admin: AdminAccess,
    State(state): State<AppState>,
) -> Result<Json<AdminStatsResponse>, AppError> {
    let total_users = user::Entity::find().count(&state.db).await?;
    let total_problems = problem::Entity::find().count(&state.db).await?;
    let total_submissions = submission::Entity::find().count(&state.db).await?;

    let solved =
        ledger::solved_slugs_by_anyone(&state.db, &state.config.submission.solved_verdicts)
            .await?;

    let difficulties: Vec<String> = problem::Entity::find()
        .select_only()
        .column(problem::Column::Difficulty)
        .filter(problem::Column::Slug.is_in(solved.iter().map(String::as_str)))
        .into_tuple()
        .all(&state.db)
        .await?;

    let count = |label: &str| difficulties.iter().filter(|d| *d == label).count() as u64;

    Ok(Json(AdminStatsResponse {
        total_users,
        total_problems,
        total_submissions,
        problems_solved_count: solved.len() as u64,
        easy_solved_count: count("Easy"),
        medium_solved_count: count("Medium"),
        hard_solved_count: count("Hard"),
    }))
}
