use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Difficulty labels used by the catalog.
pub const DIFFICULTIES: &[&str] = &["Easy", "Medium", "Hard"];

/// A problem cached from the external catalog.
///
/// Metadata is cached in bulk; `content`, `default_code` and `topic_tags_json`
/// stay `NULL` until the problem is first opened.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "problem")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub slug: String,
    pub title: String,
    /// `Easy`, `Medium`, `Hard` or `Unknown`.
    pub difficulty: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub default_code: Option<String>,
    /// JSON array of topic tag names.
    #[sea_orm(column_type = "Text", nullable)]
    pub topic_tags_json: Option<String>,

    pub created_at: DateTimeUtc,
}

impl Model {
    pub fn topic_tags(&self) -> Vec<String> {
        self.topic_tags_json
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default()
    }
}

impl ActiveModelBehavior for ActiveModel {}
