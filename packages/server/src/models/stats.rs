use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize, utoipa::ToSchema)]
pub struct RecentSubmission {
    #[schema(example = 17)]
    pub id: i32,
    #[schema(example = "two-sum")]
    pub problem_slug: String,
    /// Problem title, or the slug if the problem is no longer cached.
    #[schema(example = "Two Sum")]
    pub problem_title: String,
    #[schema(example = "Accepted")]
    pub status: String,
    pub submitted_at: DateTime<Utc>,
}

/// Statistics for the calling user.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AccountStatsResponse {
    #[schema(example = "alisher_n")]
    pub username: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    #[schema(example = 12)]
    pub total_submissions: u64,
    /// Distinct problems with a solving verdict.
    #[schema(example = 5)]
    pub problems_solved_count: u64,
    /// Newest first.
    pub recent_submissions: Vec<RecentSubmission>,
}

/// Platform-wide statistics.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AdminStatsResponse {
    #[schema(example = 120)]
    pub total_users: u64,
    #[schema(example = 2900)]
    pub total_problems: u64,
    #[schema(example = 860)]
    pub total_submissions: u64,
    /// Distinct problems with at least one solving verdict.
    #[schema(example = 310)]
    pub problems_solved_count: u64,
    #[schema(example = 200)]
    pub easy_solved_count: u64,
    #[schema(example = 90)]
    pub medium_solved_count: u64,
    #[schema(example = 20)]
    pub hard_solved_count: u64,
}
