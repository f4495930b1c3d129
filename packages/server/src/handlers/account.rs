use std::collections::HashMap;

use axum::Json;
use axum::extract::State;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{problem, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::ledger;
use crate::models::stats::{AccountStatsResponse, RecentSubmission};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/account/stats",
    tag = "Account",
    operation_id = "accountStats",
    summary = "Statistics of the calling user",
    responses(
        (status = 200, description = "Account statistics", body = AccountStatsResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, UNKNOWN_CALLER)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn account_stats(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<AccountStatsResponse>, AppError> {
    let user = user::Entity::find_by_id(auth_user.user_id)
        .one(&state.db)
        .await?
        .ok_or(AppError::UnknownCaller)?;

    let settings = &state.config.submission;
    let total_submissions = ledger::count_for_user(&state.db, user.id).await?;
    let solved =
        ledger::solved_slugs_for_user(&state.db, user.id, &settings.solved_verdicts).await?;
    let recent = ledger::list_recent_for_user(&state.db, user.id, settings.recent_limit).await?;

    let slugs: Vec<&str> = recent.iter().map(|s| s.problem_slug.as_str()).collect();
    let titles: HashMap<String, String> = problem::Entity::find()
        .select_only()
        .column(problem::Column::Slug)
        .column(problem::Column::Title)
        .filter(problem::Column::Slug.is_in(slugs))
        .into_tuple()
        .all(&state.db)
        .await?
        .into_iter()
        .collect();

    let recent_submissions = recent
        .into_iter()
        .map(|s| RecentSubmission {
            id: s.id,
            problem_title: titles
                .get(&s.problem_slug)
                .cloned()
                .unwrap_or_else(|| s.problem_slug.clone()),
            problem_slug: s.problem_slug,
            status: s.status,
            submitted_at: s.submitted_at,
        })
        .collect();

    Ok(Json(AccountStatsResponse {
        username: user.username,
        full_name: user.full_name,
        email: user.email,
        total_submissions,
        problems_solved_count: solved.len() as u64,
        recent_submissions,
    }))
}
