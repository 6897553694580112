//! OpenAPI response definitions for the error envelope.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Validation failed or the storage layer rejected the input",
    content_type = "application/json",
    examples(
        ("validation" = (value = json!({
            "status": "error",
            "errors": {
                "name": ["This field is required."],
                "price": ["Price must be greater than 0."]
            }
        }))),
        ("duplicate" = (value = json!({
            "status": "error",
            "message": "SKU already exists. Please use a unique SKU value."
        })))
    )
)]
pub struct BadRequestResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "status": "error",
        "message": "Product not found"
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Storage failure or unexpected error",
    content_type = "application/json",
    example = json!({
        "status": "error",
        "message": "Database operation failed. Please try again later."
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);
