//! Error codes attached to every error log line.
//!
//! Each code has a SCREAMING_SNAKE_CASE identifier, an integer for dashboards
//! and the default client message for its category.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::UniqueViolation;
//! assert_eq!(code.as_str(), "UNIQUE_VIOLATION");
//! assert_eq!(code.code(), 2001);
//! ```

use super::messages;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Request errors (1000-1999)
    ValidationError,
    BadRequest,
    NotFound,
    MethodNotAllowed,
    InternalError,

    // Storage errors (2000-2999)
    UniqueViolation,
    NotNullViolation,
    IntegrityViolation,
    DataFormat,
    StorageUnavailable,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::NotFound => "NOT_FOUND",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::InternalError => "INTERNAL_ERROR",
            Self::UniqueViolation => "UNIQUE_VIOLATION",
            Self::NotNullViolation => "NOT_NULL_VIOLATION",
            Self::IntegrityViolation => "INTEGRITY_VIOLATION",
            Self::DataFormat => "DATA_FORMAT",
            Self::StorageUnavailable => "STORAGE_UNAVAILABLE",
        }
    }

    /// Integer code for structured logs.
    ///
    /// - 1000-1999: request errors
    /// - 2000-2999: storage errors
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::BadRequest => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::MethodNotAllowed => 1006,

            Self::UniqueViolation => 2001,
            Self::NotNullViolation => 2002,
            Self::IntegrityViolation => 2003,
            Self::DataFormat => 2004,
            Self::StorageUnavailable => 2005,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => messages::VALIDATION_FAILED,
            Self::BadRequest => messages::BAD_REQUEST,
            Self::NotFound => messages::NOT_FOUND_RESOURCE,
            Self::MethodNotAllowed => messages::METHOD_NOT_ALLOWED,
            Self::InternalError => messages::INTERNAL_ERROR,
            Self::UniqueViolation | Self::IntegrityViolation => messages::INTEGRITY_ERROR,
            Self::NotNullViolation => messages::REQUIRED_FIELDS_MISSING,
            Self::DataFormat => messages::INVALID_DATA,
            Self::StorageUnavailable => messages::DATABASE_FAILED,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_ranges() {
        assert_eq!(ErrorCode::ValidationError.code(), 1001);
        assert_eq!(ErrorCode::MethodNotAllowed.code(), 1006);
        assert_eq!(ErrorCode::StorageUnavailable.code(), 2005);
    }

    #[test]
    fn test_error_code_display_matches_serialization() {
        let code = ErrorCode::NotNullViolation;
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, format!("\"{}\"", code));
    }

    #[test]
    fn test_default_messages() {
        assert_eq!(
            ErrorCode::DataFormat.default_message(),
            "Invalid data type or value. Please check your input fields."
        );
        assert_eq!(
            ErrorCode::StorageUnavailable.default_message(),
            "Database operation failed. Please try again later."
        );
    }
}
