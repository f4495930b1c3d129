use serde::Serialize;

use crate::entity::problem;

/// Result of refreshing the problem cache.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CacheProblemsResponse {
    #[schema(example = "Successfully cached metadata for 3 new problems. Details will be fetched on-demand when selected.")]
    pub message: String,
    #[schema(example = 3)]
    pub newly_cached: u64,
    #[schema(example = 2900)]
    pub total_cached: u64,
}

/// Problem metadata as shown in the list.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ProblemSummary {
    #[schema(example = "Two Sum")]
    pub title: String,
    #[schema(example = "two-sum")]
    pub slug: String,
    #[schema(example = "Easy")]
    pub difficulty: String,
    #[schema(example = json!(["Array", "Hash Table"]))]
    pub topic_tags: Vec<String>,
}

impl From<problem::Model> for ProblemSummary {
    fn from(model: problem::Model) -> Self {
        let topic_tags = model.topic_tags();
        Self {
            title: model.title,
            slug: model.slug,
            difficulty: model.difficulty,
            topic_tags,
        }
    }
}

/// Cached problems grouped by difficulty. `Unknown` difficulties are omitted.
#[derive(Serialize, Default, utoipa::ToSchema)]
pub struct ProblemListResponse {
    #[serde(rename = "Easy")]
    pub easy: Vec<ProblemSummary>,
    #[serde(rename = "Medium")]
    pub medium: Vec<ProblemSummary>,
    #[serde(rename = "Hard")]
    pub hard: Vec<ProblemSummary>,
}

impl ProblemListResponse {
    pub fn push(&mut self, summary: ProblemSummary) {
        match summary.difficulty.as_str() {
            "Easy" => self.easy.push(summary),
            "Medium" => self.medium.push(summary),
            "Hard" => self.hard.push(summary),
            _ => {}
        }
    }
}

/// Full problem statement.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ProblemDetailResponse {
    #[schema(example = "Two Sum")]
    pub title: String,
    #[schema(example = "two-sum")]
    pub slug: String,
    /// Statement, translated to Uzbek where possible.
    pub content: Option<String>,
    #[schema(example = "Easy")]
    pub difficulty: String,
    pub default_code: Option<String>,
    pub topic_tags: Vec<String>,
}

impl From<problem::Model> for ProblemDetailResponse {
    fn from(model: problem::Model) -> Self {
        let topic_tags = model.topic_tags();
        Self {
            title: model.title,
            slug: model.slug,
            content: model.content,
            difficulty: model.difficulty,
            default_code: model.default_code,
            topic_tags,
        }
    }
}
