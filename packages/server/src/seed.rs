use sea_orm::sea_query::Index;
use sea_orm::*;
use tracing::{info, warn};

use crate::entity::submission;

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support composite non-unique indexes,
/// so we create them manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();

    // Recent-submissions query:
    // SELECT ... FROM submission WHERE user_id = ? ORDER BY submitted_at DESC LIMIT ?
    let index = Index::create()
        .if_not_exists()
        .name("idx_submission_user_submitted")
        .table(submission::Entity)
        .col(submission::Column::UserId)
        .col(submission::Column::SubmittedAt)
        .to_owned();
    create_index(db, backend.build(&index), "idx_submission_user_submitted").await;

    // Admin stats join submissions to problems by slug.
    let index = Index::create()
        .if_not_exists()
        .name("idx_submission_problem_slug")
        .table(submission::Entity)
        .col(submission::Column::ProblemSlug)
        .to_owned();
    create_index(db, backend.build(&index), "idx_submission_problem_slug").await;

    Ok(())
}

async fn create_index(db: &DatabaseConnection, stmt: Statement, name: &str) {
    match db.execute_raw(stmt).await {
        Ok(_) => info!("Ensured index {} exists", name),
        Err(e) => warn!("Failed to create index {}: {}", name, e),
    }
}
