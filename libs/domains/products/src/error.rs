use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, FieldErrors};
use database::DatabaseError;
use thiserror::Error;

pub const PRODUCT_NOT_FOUND: &str = "Product not found";

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(i32),

    #[error("Invalid input: {0}")]
    Validation(#[from] FieldErrors),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<sea_orm::DbErr> for ProductError {
    fn from(err: sea_orm::DbErr) -> Self {
        ProductError::Database(err.into())
    }
}

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(_) => AppError::not_found(PRODUCT_NOT_FOUND),
            ProductError::Validation(errors) => AppError::Validation(errors),
            ProductError::Database(err) => err.into(),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_helpers::{ErrorCode, classify};

    #[test]
    fn test_not_found_uses_product_message() {
        let classified = classify(&ProductError::NotFound(42).into());
        assert_eq!(classified.status, StatusCode::NOT_FOUND);
        assert_eq!(classified.body.message.as_deref(), Some(PRODUCT_NOT_FOUND));
    }

    #[test]
    fn test_duplicate_sku_maps_to_sku_message() {
        let err = ProductError::Database(DatabaseError::UniqueViolation {
            constraint: Some("products_sku_key".into()),
            message: "duplicate key value violates unique constraint".into(),
        });

        let classified = classify(&err.into());
        assert_eq!(classified.status, StatusCode::BAD_REQUEST);
        assert_eq!(classified.code, ErrorCode::UniqueViolation);
        assert_eq!(
            classified.body.message.as_deref(),
            Some("SKU already exists. Please use a unique SKU value.")
        );
    }

    #[test]
    fn test_unavailable_storage_is_server_error() {
        let err = ProductError::Database(DatabaseError::Unavailable("pool timed out".into()));
        let classified = classify(&err.into());
        assert_eq!(classified.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(classified.code, ErrorCode::StorageUnavailable);
    }

    #[test]
    fn test_validation_keeps_field_messages() {
        let mut errors = FieldErrors::new();
        errors.add("sku", "This field is required.");

        let classified = classify(&ProductError::Validation(errors).into());
        assert_eq!(classified.status, StatusCode::BAD_REQUEST);
        let body = classified.body.errors.unwrap();
        assert_eq!(body["sku"], vec!["This field is required."]);
    }
}
