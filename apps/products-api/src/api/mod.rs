//! API routes module

pub mod health;
pub mod products;

use axum::{Json, Router, routing::get};
use axum_helpers::ApiResponse;

use crate::state::AppState;

pub const WELCOME_MESSAGE: &str = "Welcome to the Store Inventory API!";

/// Service greeting
#[utoipa::path(
    get,
    path = "/",
    tag = "Service",
    responses(
        (status = 200, description = "Greeting", body = ApiResponse<String>)
    )
)]
pub async fn welcome() -> Json<ApiResponse<()>> {
    Json(ApiResponse::message(WELCOME_MESSAGE))
}

/// Create all API routes. `create_router` adds the fallbacks and layers.
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .nest("/products", products::router(state))
}

/// Router with the `/ready` endpoint that probes the database.
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
