pub mod catalog;
pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod judge;
pub mod ledger;
pub mod models;
pub mod routes;
pub mod seed;
pub mod state;
pub mod telemetry;
pub mod utils;

use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::routing::get;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_scalar::{Scalar, Servable as ScalarServable};

use crate::config::CorsConfig;
use crate::extractors::auth::ADMIN_TOKEN_HEADER;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "UzCode AI Judge API",
        version = "1.0.0",
        description = "Coding practice backend that judges Python solutions with a generative AI model"
    ),
    paths(
        handlers::meta::health,
        handlers::meta::about,
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::me,
        handlers::submission::create_submission,
        handlers::submission::get_submission,
        handlers::judge::judge_code,
        handlers::problem::cache_problems,
        handlers::problem::list_problems,
        handlers::problem::get_problem,
        handlers::account::account_stats,
        handlers::admin::admin_stats,
    ),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Submissions", description = "Submitting and retrieving judged solutions"),
        (name = "Judge", description = "Judging without recording"),
        (name = "Problems", description = "Cached problem catalog"),
        (name = "Account", description = "Per-user statistics"),
        (name = "Admin", description = "Platform statistics"),
        (name = "Meta", description = "Health and project information"),
    ),
    modifiers(&SecurityAddon),
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        components.add_security_scheme(
            "admin_token",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(ADMIN_TOKEN_HEADER))),
        );
    }
}

pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let origins = if cors.allow_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            cors.allow_origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-admin-token"),
        ])
        .max_age(Duration::from_secs(cors.max_age))
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let api = openapi();
    let cors = cors_layer(&state.config.server.cors);

    axum::Router::new()
        .route("/", get(handlers::meta::health))
        .nest("/api", routes::api_routes())
        .with_state(state)
        .route(
            "/api-docs/openapi.json",
            get({
                let api = api.clone();
                move || async move { axum::Json(api) }
            }),
        )
        .merge(Scalar::with_url("/scalar", api))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
