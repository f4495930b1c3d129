use serde::Serialize;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: &'static str,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AboutResponse {
    pub project_name: &'static str,
    pub description: &'static str,
    pub author: &'static str,
    pub copyright: String,
}
