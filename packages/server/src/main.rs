use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{Level, info};

use sales_server::config::AppConfig;
use sales_server::state::AppState;
use sales_server::{build_router, database, scheduler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load().context("Failed to load config")?;

    let db = database::init_db(&config.database)
        .await
        .context("Failed to initialize database")?;
    database::ensure_indexes(&db)
        .await
        .context("Failed to create indexes")?;

    if config.refresh.enabled {
        // TODO: keep the handle for graceful shutdown; the task runs until process exit.
        tokio::spawn(scheduler::run_refresh_scheduler(
            db.clone(),
            config.refresh.clone(),
        ));
    } else {
        info!("Scheduled refresh disabled");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let state = AppState {
        config: Arc::new(config),
        db,
    };
    let app = build_router(state);

    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
