use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use uzcode_server::catalog::LeetCodeCatalog;
use uzcode_server::config::AppConfig;
use uzcode_server::judge::{JudgeClient, Translator};
use uzcode_server::state::AppState;
use uzcode_server::{build_router, database, seed, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    telemetry::init_tracing(&config.log);

    let db = database::init_db(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    seed::ensure_indexes(&db).await?;

    let judge = JudgeClient::from_config(&config.judge).context("Failed to build judge client")?;
    let translator = Translator::new(judge.transport());
    let catalog = LeetCodeCatalog::new(&config.catalog).context("Failed to build catalog client")?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    info!(
        model = %config.judge.model,
        max_attempts = config.judge.max_attempts,
        "Judge configured"
    );

    let state = AppState {
        db,
        config: Arc::new(config),
        judge: Arc::new(judge),
        translator: Arc::new(translator),
        catalog: Arc::new(catalog),
    };

    let app = build_router(state);

    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
