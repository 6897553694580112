use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use super::PostgresConfig;
use crate::common::{retry_if, DatabaseError, RetryConfig};

/// Opens a pool with default settings.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    connect_from_config(PostgresConfig::new(database_url)).await
}

pub async fn connect_from_config(config: PostgresConfig) -> Result<DatabaseConnection, DbErr> {
    let max_connections = config.max_connections;
    let db = Database::connect(config.into_connect_options()).await?;
    info!(max_connections, "Connected to PostgreSQL");
    Ok(db)
}

/// Opens a pool, retrying while the server is unreachable.
///
/// Errors that are not availability failures (bad credentials, unknown
/// database) are returned on the first attempt.
pub async fn connect_with_retry(
    config: PostgresConfig,
    retry_config: RetryConfig,
) -> Result<DatabaseConnection, DatabaseError> {
    retry_if(
        || {
            let config = config.clone();
            async move { connect_from_config(config).await.map_err(DatabaseError::from) }
        },
        DatabaseError::is_transient,
        retry_config,
    )
    .await
}

/// Applies pending migrations of `M`.
pub async fn run_migrations<M: MigratorTrait>(
    db: &DatabaseConnection,
    app_name: &str,
) -> Result<(), DbErr> {
    info!(app = app_name, "Running database migrations");
    M::up(db, None).await?;
    info!(app = app_name, "Migrations complete");
    Ok(())
}
