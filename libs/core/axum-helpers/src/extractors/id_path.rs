//! Integer id path parameter.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

/// Positive integer path id.
///
/// Anything that is not a plain run of digits fitting an `i32` does not
/// address a resource, so the rejection is the generic 404.
///
/// ```ignore
/// async fn get_product(IdPath(id): IdPath) -> Result<Json<Product>, AppError> { ... }
///
/// let app = Router::new().route("/products/{id}", get(get_product));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPath(pub i32);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound(None))?;

        parse_id(&raw).map(IdPath).ok_or(AppError::NotFound(None))
    }
}

fn parse_id(raw: &str) -> Option<i32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
