use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/submissions", submission_routes())
        .nest("/problems", problem_routes())
        .route("/judge", post(handlers::judge::judge_code))
        .route("/account/stats", get(handlers::account::account_stats))
        .route("/admin/stats", get(handlers::admin::admin_stats))
        .route("/about", get(handlers::meta::about))
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/me", get(handlers::auth::me))
}

fn submission_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::submission::create_submission))
        .route("/{id}", get(handlers::submission::get_submission))
}

fn problem_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::problem::list_problems))
        .route("/cache", post(handlers::problem::cache_problems))
        .route("/{slug}", get(handlers::problem::get_problem))
}
