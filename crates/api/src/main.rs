use std::net::SocketAddr;

use anyhow::{Context, Result};
use tracing::info;

use todo_api::app::create_app;
use todo_api::config::Config;
use todo_api::middleware::{init_metrics, logging::init_logging};
use todo_api::services::bootstrap_admin;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load().context("Failed to load configuration")?;

    init_logging(&config.logging).context("Failed to initialize logging")?;
    init_metrics().context("Failed to install Prometheus recorder")?;

    info!("Starting ToDo API v{}", env!("CARGO_PKG_VERSION"));

    let pool = persistence::db::create_pool(&config.database.clone().into())
        .await
        .context("Failed to connect to database")?;

    info!("Running database migrations...");
    persistence::db::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;
    info!("Migrations completed");

    bootstrap_admin(&pool, &config.admin)
        .await
        .context("Failed to seed administrator")?;

    let addr = config.socket_addr()?;
    let app = create_app(config, pool).context("Invalid JWT key configuration")?;

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
