//! Store Inventory API - REST server over PostgreSQL

use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::RetryConfig;
use migration::Migrator;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let db = database::postgres::connect_with_retry(config.database.clone(), RetryConfig::default())
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    if config.run_migrations {
        database::postgres::run_migrations::<Migrator>(&db, config.app.name).await?;
    } else {
        info!("Skipping migrations (RUN_MIGRATIONS=false)");
    }

    let state = AppState { config, db };

    // - /health: liveness with app name/version
    // - /ready: readiness with a database probe
    let api_routes = api::routes(&state)
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    let app = create_router::<openapi::ApiDoc>(api_routes);

    info!(
        port = state.config.server.port,
        "Starting Store Inventory API"
    );

    let server = state.config.server.clone();
    create_production_app(app, &server, async move {
        info!("Shutting down: closing database connections");
        match state.db.close().await {
            Ok(()) => info!("PostgreSQL connection closed successfully"),
            Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Store Inventory API shutdown complete");
    Ok(())
}
