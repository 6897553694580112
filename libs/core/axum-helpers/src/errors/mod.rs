pub mod codes;
pub mod fields;
pub mod handlers;
pub mod messages;
pub mod responses;

pub use codes::ErrorCode;
pub use fields::FieldErrors;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::DatabaseError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Body of every error response.
///
/// Exactly one of `message` and `errors` is present:
///
/// ```json
/// { "status": "error", "message": "Product not found" }
/// { "status": "error", "errors": { "name": ["This field is required."] } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `"error"`
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Field name to every message raised for it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ErrorResponse {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
            errors: None,
        }
    }

    pub fn with_errors(errors: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            status: "error".to_string(),
            message: None,
            errors: Some(errors),
        }
    }
}

/// Every failure a request can end in.
///
/// Storage failures arrive already classified through
/// `From<DatabaseError>`; anything unrecognised becomes `Unclassified`, whose
/// detail is logged and never sent to the client.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(#[from] FieldErrors),

    #[error("Unique constraint violated on {}", .field.as_deref().unwrap_or("unknown field"))]
    UniqueViolation { field: Option<String> },

    #[error("Not-null constraint violated on {}", .column.as_deref().unwrap_or("unknown column"))]
    NotNullViolation { column: Option<String> },

    #[error("Integrity constraint violated: {0}")]
    IntegrityViolation(String),

    #[error("Invalid data: {0}")]
    DataFormat(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// `Some` carries the client message, `None` uses the generic one
    #[error("Not found: {}", .0.as_deref().unwrap_or("resource"))]
    NotFound(Option<String>),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Unexpected error: {0}")]
    Unclassified(String),
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(Some(message.into()))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors.into())
    }
}

/// Outcome of [`classify`]: what the client receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
    pub status: StatusCode,
    pub code: ErrorCode,
    pub body: ErrorResponse,
}

impl ClassifiedError {
    fn message(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            body: ErrorResponse::with_message(message),
        }
    }

    fn default_for(status: StatusCode, code: ErrorCode) -> Self {
        Self::message(status, code, code.default_message())
    }
}

/// Maps an error to its status code and client body.
///
/// Pure: logging happens in [`IntoResponse`].
pub fn classify(error: &AppError) -> ClassifiedError {
    match error {
        AppError::Validation(errors) if errors.is_empty() => {
            ClassifiedError::default_for(StatusCode::BAD_REQUEST, ErrorCode::ValidationError)
        }
        AppError::Validation(errors) => ClassifiedError {
            status: StatusCode::BAD_REQUEST,
            code: ErrorCode::ValidationError,
            body: ErrorResponse::with_errors(errors.clone().into_inner()),
        },
        AppError::UniqueViolation { field: Some(field) } => ClassifiedError::message(
            StatusCode::BAD_REQUEST,
            ErrorCode::UniqueViolation,
            messages::already_exists(field),
        ),
        AppError::UniqueViolation { field: None } => {
            ClassifiedError::default_for(StatusCode::BAD_REQUEST, ErrorCode::UniqueViolation)
        }
        AppError::NotNullViolation { .. } => {
            ClassifiedError::default_for(StatusCode::BAD_REQUEST, ErrorCode::NotNullViolation)
        }
        AppError::IntegrityViolation(_) => {
            ClassifiedError::default_for(StatusCode::BAD_REQUEST, ErrorCode::IntegrityViolation)
        }
        AppError::DataFormat(_) => {
            ClassifiedError::default_for(StatusCode::BAD_REQUEST, ErrorCode::DataFormat)
        }
        AppError::StorageUnavailable(_) => ClassifiedError::default_for(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::StorageUnavailable,
        ),
        AppError::BadRequest(_) => {
            ClassifiedError::default_for(StatusCode::BAD_REQUEST, ErrorCode::BadRequest)
        }
        AppError::NotFound(Some(message)) => {
            ClassifiedError::message(StatusCode::NOT_FOUND, ErrorCode::NotFound, message.clone())
        }
        AppError::NotFound(None) => {
            ClassifiedError::default_for(StatusCode::NOT_FOUND, ErrorCode::NotFound)
        }
        AppError::MethodNotAllowed => {
            ClassifiedError::default_for(StatusCode::METHOD_NOT_ALLOWED, ErrorCode::MethodNotAllowed)
        }
        AppError::Unclassified(_) => ClassifiedError::default_for(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalError,
        ),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let classified = classify(&self);
        let error_code = classified.code.code();

        if classified.status.is_server_error() {
            tracing::error!(error_code, status = %classified.status, "{}", self);
        } else {
            match classified.code {
                ErrorCode::UniqueViolation
                | ErrorCode::NotNullViolation
                | ErrorCode::IntegrityViolation
                | ErrorCode::DataFormat => {
                    tracing::warn!(error_code, status = %classified.status, "{}", self)
                }
                _ => tracing::info!(error_code, status = %classified.status, "{}", self),
            }
        }

        (classified.status, Json(classified.body)).into_response()
    }
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::UniqueViolation { constraint, .. } => AppError::UniqueViolation {
                field: constraint.as_deref().and_then(field_from_constraint),
            },
            DatabaseError::NotNullViolation { column, .. } => AppError::NotNullViolation { column },
            DatabaseError::IntegrityViolation(message) => AppError::IntegrityViolation(message),
            DatabaseError::DataFormat(message) => AppError::DataFormat(message),
            DatabaseError::Unavailable(message) | DatabaseError::HealthCheckFailed(message) => {
                AppError::StorageUnavailable(message)
            }
            DatabaseError::Other(e) => AppError::Unclassified(e.to_string()),
        }
    }
}

/// Recovers the column from a PostgreSQL-generated constraint name
/// (`products_sku_key`, `idx-products-sku`).
///
/// Primary keys are never reported as a field.
pub fn field_from_constraint(constraint: &str) -> Option<String> {
    if constraint.ends_with("_pkey") {
        return None;
    }

    let base = ["_key", "_unique", "_idx"]
        .iter()
        .find_map(|suffix| constraint.strip_suffix(suffix))
        .unwrap_or(constraint);

    let field = base.rsplit(['_', '-']).next()?;
    (!field.is_empty()).then(|| field.to_owned())
}
