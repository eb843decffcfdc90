//! SimpleStorage API server entry point.

use std::error::Error;
use std::sync::Arc;

use simple_storage_api::config::AppConfig;
use simple_storage_api::error::AppError;
use simple_storage_api::state::AppState;
use simple_storage_api::telemetry;
use simple_storage_core::clock::SystemClock;
use simple_storage_core::repository::EventRepository;
use simple_storage_event_store::MIGRATOR;
use simple_storage_event_store::memory_event_repository::InMemoryEventRepository;
use simple_storage_event_store::pg_event_repository::PgEventRepository;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::from_env()?;
    let telemetry = telemetry::init(&config)?;

    info!("Starting SimpleStorage API server");

    let event_repository = build_event_repository(&config).await?;
    let app_state = AppState::new(Arc::new(SystemClock), event_repository);
    let app = simple_storage_api::app(app_state);

    let addr = config.bind_addr()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::from)?;

    telemetry.shutdown();

    Ok(())
}

/// PostgreSQL when `DATABASE_URL` is set, in memory otherwise.
async fn build_event_repository(
    config: &AppConfig,
) -> Result<Arc<dyn EventRepository>, AppError> {
    let Some(database_url) = config.database_url.as_deref() else {
        warn!("DATABASE_URL not set; events are kept in memory and lost on exit");
        return Ok(Arc::new(InMemoryEventRepository::new()));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(database_url)
        .await?;
    MIGRATOR.run(&pool).await?;

    info!(
        max_connections = config.database_max_connections,
        "using PostgreSQL event store"
    );
    Ok(Arc::new(PgEventRepository::new(pool)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
