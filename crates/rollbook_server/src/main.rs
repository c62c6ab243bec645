use anyhow::Context;
use tracing::info;

use rollbook_core::{Database, ServerConfig, logging};
use rollbook_server::{AppState, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Process-wide initialization: config and logging are read/installed
    // once here and never mutated afterward.
    let config = ServerConfig::from_env();
    let _guard = logging::init_logging(&config.logs_dir)?;
    info!("Starting rollbook v{}", env!("CARGO_PKG_VERSION"));

    let db = Database::open_at(config.database_path.clone())?;
    let state = AppState::new(db);
    let app = router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on {addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
