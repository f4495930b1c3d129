use std::collections::HashSet;

use axum::Json;
use axum::extract::{Path, State};
use sea_orm::*;
use tracing::{info, instrument, warn};

use crate::entity::problem;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AdminAccess;
use crate::models::problem::*;
use crate::state::AppState;

const NO_DEFAULT_CODE: &str = "# No default code snippet available.";

#[utoipa::path(
    post,
    path = "/api/v1/problems/cache",
    tag = "Problems",
    operation_id = "cacheProblems",
    summary = "Cache problem metadata from the catalog",
    description = "Fetches the list of free problems and stores slug, title and difficulty for every problem not cached yet. Statements are fetched later, when a problem is first opened. Requires the admin token.",
    responses(
        (status = 200, description = "Cache refreshed", body = CacheProblemsResponse),
        (status = 401, description = "Missing or wrong admin token (TOKEN_INVALID)", body = ErrorBody),
        (status = 503, description = "Catalog unavailable (UPSTREAM_UNAVAILABLE)", body = ErrorBody),
    ),
    params(("admin_token" = Option<String>, Query, description = "Admin token, if not sent as `X-Admin-Token`")),
    security(("admin_token" = [])),
)]
#[instrument(skip(state, _admin))]
pub async fn cache_problems(
    _admin: AdminAccess,
    State(state): State<AppState>,
) -> Result<Json<CacheProblemsResponse>, AppError> {
    let entries = state.catalog.list_free_problems().await?;

    let txn = state.db.begin().await?;

    let cached: HashSet<String> = problem::Entity::find()
        .select_only()
        .column(problem::Column::Slug)
        .into_tuple()
        .all(&txn)
        .await?
        .into_iter()
        .collect();

    let now = chrono::Utc::now();
    let mut seen = HashSet::new();
    let mut newly_cached = 0u64;
    for entry in entries {
        if cached.contains(&entry.slug) || !seen.insert(entry.slug.clone()) {
            continue;
        }
        problem::ActiveModel {
            slug: Set(entry.slug),
            title: Set(entry.title),
            difficulty: Set(entry.difficulty),
            content: Set(None),
            default_code: Set(None),
            topic_tags_json: Set(None),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        newly_cached += 1;
    }

    txn.commit().await?;

    let total_cached = problem::Entity::find().count(&state.db).await?;
    info!(newly_cached, total_cached, "Problem cache refreshed");

    Ok(Json(CacheProblemsResponse {
        message: format!(
            "Successfully cached metadata for {newly_cached} new problems. Details will be fetched on-demand when selected."
        ),
        newly_cached,
        total_cached,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/problems",
    tag = "Problems",
    operation_id = "listProblems",
    summary = "List cached problems by difficulty",
    responses(
        (status = 200, description = "Problems grouped by difficulty", body = ProblemListResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn list_problems(
    State(state): State<AppState>,
) -> Result<Json<ProblemListResponse>, AppError> {
    let problems = problem::Entity::find()
        .order_by_asc(problem::Column::Id)
        .all(&state.db)
        .await?;

    let mut grouped = ProblemListResponse::default();
    for model in problems {
        grouped.push(ProblemSummary::from(model));
    }
    Ok(Json(grouped))
}

#[utoipa::path(
    get,
    path = "/api/v1/problems/{slug}",
    tag = "Problems",
    operation_id = "getProblem",
    summary = "Get a problem statement",
    description = "Returns the full statement. The first request for a problem fetches it from the catalog, translates it to Uzbek and caches it.",
    params(("slug" = String, Path, description = "Problem slug")),
    responses(
        (status = 200, description = "Problem details", body = ProblemDetailResponse),
        (status = 404, description = "Problem not cached (NOT_FOUND)", body = ErrorBody),
        (status = 503, description = "Catalog unavailable (UPSTREAM_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_problem(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProblemDetailResponse>, AppError> {
    let model = problem::Entity::find()
        .filter(problem::Column::Slug.eq(&slug))
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Problem not found. Run the cache endpoint first.".into())
        })?;

    if model.content.is_some() {
        return Ok(Json(ProblemDetailResponse::from(model)));
    }

    let model = fill_details(&state, model).await?;
    Ok(Json(ProblemDetailResponse::from(model)))
}

/// Fetch, translate and persist the statement of a metadata-only problem.
async fn fill_details(
    state: &AppState,
    model: problem::Model,
) -> Result<problem::Model, AppError> {
    let detail = state.catalog.problem_detail(&model.slug).await?;
    let mut active: problem::ActiveModel = model.clone().into();

    match detail {
        Some(detail) => {
            let default_code = detail.python_snippet().unwrap_or(NO_DEFAULT_CODE).to_string();
            let tags = serde_json::to_string(&detail.topic_tag_names())
                .map_err(|e| AppError::Internal(format!("Topic tag serialization error: {e}")))?;
            let english = detail.content.unwrap_or_else(|| {
                format!(
                    "## {} - {}\n\n[CONTENT UNAVAILABLE]",
                    model.title, model.difficulty
                )
            });

            active.content = Set(Some(state.translator.to_uzbek(&english).await));
            active.default_code = Set(Some(default_code));
            active.topic_tags_json = Set(Some(tags));
            info!(slug = %model.slug, "Problem details cached");
        }
        None => {
            warn!(slug = %model.slug, "Catalog has no details for problem");
            active.content = Set(Some(format!(
                "## {} - {}\n\n[Unable to fetch content from LeetCode API.]",
                model.title, model.difficulty
            )));
        }
    }

    Ok(active.update(&state.db).await?)
}
