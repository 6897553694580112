//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Store Inventory API",
        version = "0.1.0",
        description = "CRUD over store products with structured validation and storage errors"
    ),
    paths(crate::api::welcome),
    components(schemas(axum_helpers::ErrorResponse)),
    nest(
        (path = "/products", api = domain_products::ApiDoc)
    ),
    tags(
        (name = "Products", description = "Product inventory endpoints"),
        (name = "Service", description = "Service information")
    )
)]
pub struct ApiDoc;
