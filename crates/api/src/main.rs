use anyhow::{Context, Result};
use domain::clock::SystemClock;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use qyra_api::app::{create_app, AppState, Stores};
use qyra_api::config::{Config, StorageBackend};
use qyra_api::middleware::{init_metrics, logging::init_logging};
use qyra_api::services::bootstrap_admin;

/// Interval for connection pool gauges.
const POOL_METRICS_INTERVAL: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    init_logging(&config.logging).context("failed to initialize logging")?;
    init_metrics().context("failed to install Prometheus recorder")?;

    info!("Starting Qyra API v{}", env!("CARGO_PKG_VERSION"));

    let stores = match config.storage.backend {
        StorageBackend::Postgres => {
            let db_config = persistence::db::DatabaseConfig::from(&config.database);
            let pool = persistence::db::create_pool(&db_config).await?;

            info!("Running database migrations...");
            persistence::db::run_migrations(&pool).await?;
            info!("Migrations completed");

            let metrics_pool = pool.clone();
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(POOL_METRICS_INTERVAL);
                loop {
                    ticker.tick().await;
                    persistence::metrics::record_pool_metrics(&metrics_pool);
                }
            });

            Stores::postgres(pool)
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage; queue state is lost on restart");
            Stores::in_memory()
        }
    };

    bootstrap_admin(stores.admins.as_ref(), &config.admin).await?;

    let addr = config.socket_addr()?;
    let state = AppState::new(config, stores, Arc::new(SystemClock))?;
    let app = create_app(state);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
