//! # Axum Helpers
//!
//! Shared HTTP plumbing for the store services.
//!
//! - **[`errors`]**: the [`AppError`] taxonomy, its pure [`classify`] mapping to
//!   status codes and JSON bodies, fallback handlers
//! - **[`extractors`]**: [`IdPath`] and [`JsonBody`], rejecting into the error envelope
//! - **[`envelope`]**: the success envelope [`ApiResponse`]
//! - **[`server`]**: router assembly, health endpoints, graceful shutdown
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//! use core_config::app_info;
//!
//! let router = create_router::<ApiDoc>(api_routes.merge(health_router(app_info!())));
//! create_production_app(router, &server_config, async {}).await?;
//! ```

pub mod envelope;
pub mod errors;
pub mod extractors;
pub mod server;

pub use envelope::ApiResponse;
pub use errors::{AppError, ClassifiedError, ErrorCode, ErrorResponse, FieldErrors, classify};
pub use extractors::{IdPath, JsonBody};
pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app,
    create_router, health_router, run_health_checks, shutdown_signal,
};
