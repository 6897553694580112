//! Client-facing error messages. These strings are part of the API contract.

pub const VALIDATION_FAILED: &str = "Request validation failed.";
pub const SKU_ALREADY_EXISTS: &str = "SKU already exists. Please use a unique SKU value.";
pub const REQUIRED_FIELDS_MISSING: &str = "One or more required fields are missing.";
pub const INTEGRITY_ERROR: &str = "Database integrity error. Please check your input.";
pub const INVALID_DATA: &str = "Invalid data type or value. Please check your input fields.";
pub const DATABASE_FAILED: &str = "Database operation failed. Please try again later.";
pub const BAD_REQUEST: &str = "Bad request. Please check your JSON payload or parameters.";
pub const NOT_FOUND_RESOURCE: &str = "The requested resource was not found.";
pub const METHOD_NOT_ALLOWED: &str = "HTTP method not allowed on this endpoint.";
pub const INTERNAL_ERROR: &str = "An unexpected error occurred. Please try again later.";

/// Message for a unique violation on `field`.
///
/// `sku` gets its dedicated wording; other fields are capitalised into
/// `"<Field> already exists. Please use a unique value."`.
pub fn already_exists(field: &str) -> String {
    if field.eq_ignore_ascii_case("sku") {
        return SKU_ALREADY_EXISTS.to_string();
    }

    let mut chars = field.chars();
    let capitalised: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    format!("{capitalised} already exists. Please use a unique value.")
}
