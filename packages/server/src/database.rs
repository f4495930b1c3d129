use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    // An in-memory SQLite database lives and dies with its connection.
    let max_connections = if db_url.starts_with("sqlite::memory:") {
        1
    } else {
        20
    };

    opt.max_connections(max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(false);

    let db = Database::connect(opt).await?;
    db.get_schema_registry("uzcode_server::entity::*")
        .sync(&db)
        .await?;

    Ok(db)
}
