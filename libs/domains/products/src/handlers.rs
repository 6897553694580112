//! HTTP handlers for Products API

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    ApiResponse, AppError, ErrorResponse, FieldErrors, IdPath, JsonBody,
    errors::responses::{BadRequestResponse, InternalServerErrorResponse, NotFoundResponse},
};
use serde_json::Value;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::{
    ListQuery, PageRequest, Product, ProductCategory, ProductListResponse, ProductPayload,
};
use crate::repository::ProductRepository;
use crate::service::ProductService;

pub const PRODUCT_CREATED: &str = "Product created successfully";
pub const PRODUCT_UPDATED: &str = "Product updated successfully";
pub const PRODUCT_DELETED: &str = "Product deleted successfully";

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        delete_product,
    ),
    components(
        schemas(
            Product, ProductCategory, ProductPayload, ProductListResponse,
            ErrorResponse, FieldErrors
        ),
        responses(
            BadRequestResponse,
            NotFoundResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product inventory endpoints")
    )
)]
pub struct ApiDoc;

/// Create the products router; mount it under `/products`
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(shared_service)
}

/// List products, one page at a time
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of products", body = ProductListResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ProductResult<Json<ProductListResponse>> {
    // Keys are read one by one so a bad or repeated key never resets the others.
    let request = query
        .map(|Query(pairs)| PageRequest::from(ListQuery::from_pairs(pairs)))
        .unwrap_or_default();

    let page = service.list_products(request).await?;
    Ok(Json(ProductListResponse::new(request, page)))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = ProductPayload,
    responses(
        (status = 201, description = "Product created successfully", body = ApiResponse<Product>),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    JsonBody(input): JsonBody<Value>,
) -> ProductResult<impl IntoResponse> {
    let product = service.create_product(&input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(PRODUCT_CREATED, product)),
    ))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = ApiResponse<Product>),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    IdPath(id): IdPath,
) -> ProductResult<Json<ApiResponse<Product>>> {
    let product = service.get_product(id).await?;
    Ok(Json(ApiResponse::data(product)))
}

/// Update some or all fields of a product
///
/// The product is looked up before the body is read, so an unknown id is a
/// 404 whatever the body contains.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    request_body = ProductPayload,
    responses(
        (status = 200, description = "Product updated successfully", body = ApiResponse<Product>),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    IdPath(id): IdPath,
    body: Result<JsonBody<Value>, AppError>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    service.get_product(id).await?;

    let JsonBody(input) = body?;
    let product = service.update_product(id, &input).await?;
    Ok(Json(ApiResponse::with_message(PRODUCT_UPDATED, product)))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted successfully"),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    IdPath(id): IdPath,
) -> ProductResult<Json<ApiResponse<()>>> {
    service.delete_product(id).await?;
    Ok(Json(ApiResponse::message(PRODUCT_DELETED)))
}
