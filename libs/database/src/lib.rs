//! PostgreSQL connectivity for the store services.
//!
//! # Features
//!
//! - `postgres` (default) - SeaORM pool, migrations and health checks
//! - `config` - `core_config::FromEnv` for [`postgres::PostgresConfig`]
//!
//! ```ignore
//! use database::postgres::{self, PostgresConfig};
//! use database::RetryConfig;
//!
//! let db = postgres::connect_with_retry(PostgresConfig::from_env()?, RetryConfig::default()).await?;
//! postgres::run_migrations::<migration::Migrator>(&db, "products-api").await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult, RetryConfig};
