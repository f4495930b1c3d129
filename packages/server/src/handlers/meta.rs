use axum::Json;
use chrono::{Datelike, Utc};

use crate::models::meta::{AboutResponse, HealthResponse};

#[utoipa::path(
    get,
    path = "/",
    tag = "Meta",
    operation_id = "health",
    summary = "Liveness probe",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[utoipa::path(
    get,
    path = "/api/v1/about",
    tag = "Meta",
    operation_id = "about",
    summary = "About the project",
    responses((status = 200, description = "Project information", body = AboutResponse)),
)]
pub async fn about() -> Json<AboutResponse> {
    Json(AboutResponse {
        project_name: "UzLeetCode AI Judge",
        description: "An automated coding platform leveraging the Gemini API for intelligent code critique and judging, inspired by LeetCode.",
        author: "UzLeetCode Team",
        copyright: format!("All rights reserved UzLeetCode {}", Utc::now().year()),
    })
}
