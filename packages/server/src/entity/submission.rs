use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Language recorded when the client does not declare one.
pub const DEFAULT_LANGUAGE: &str = "Python";

/// Analysis payload stored before judging completes.
pub const EMPTY_ANALYSIS: &str = "{}";

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "submission")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id", on_delete = "Cascade")]
    pub user: HasOne<super::user::Entity>,

    /// Problems are referenced by slug, the catalog's stable key.
    pub problem_slug: String,

    #[sea_orm(column_type = "Text")]
    pub code: String,
    pub language: String,
    /// One of: Pending, Failed, System Error, or the judge's verdict.
    pub status: String,
    /// Serialized `AnalysisResult`, `{}` until judging finishes.
    #[sea_orm(column_type = "Text")]
    pub analysis: String,

    pub submitted_at: DateTimeUtc,
}

impl Model {
    /// Decoded analysis payload, `{}` if empty or not valid JSON.
    pub fn analysis_json(&self) -> serde_json::Value {
        serde_json::from_str(&self.analysis)
            .unwrap_or_else(|_| serde_json::Value::Object(Default::default()))
    }
}

impl ActiveModelBehavior for ActiveModel {}
