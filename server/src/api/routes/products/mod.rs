//! Product API endpoints

pub mod types;

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::extractors::ValidatedJson;
use crate::api::types::{ApiError, map_page};
use crate::data::query::{ListParams, validate};
use crate::data::sqlite::SqliteService;
use crate::data::sqlite::repositories::{product, store};
use stockroom::table::types::QueryResult;

use types::{CreateProductRequest, ProductDto, UpdateProductRequest};

/// Shared state for Product API endpoints
#[derive(Clone)]
pub struct ProductsApiState {
    pub database: Arc<SqliteService>,
}

/// Build Product API routes
pub fn routes(database: Arc<SqliteService>) -> Router<()> {
    let state = ProductsApiState { database };

    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{product_id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(state)
}

/// List products with search/filter/sort/pagination
#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "products",
    params(
        ("search" = Option<String>, Query, description = "Free-text search over product names and categories"),
        ("filters" = Option<String>, Query, description = "JSON array of filter conditions"),
        ("sort" = Option<String>, Query, description = "JSON array of sort entries; first one is honored"),
        ("page" = Option<u32>, Query, description = "Page number (1-based)"),
        ("pageSize" = Option<u32>, Query, description = "Items per page (1-1000)")
    ),
    responses(
        (status = 200, description = "One page of products with the total match count"),
        (status = 400, description = "Invalid query parameters")
    )
)]
pub async fn list_products(
    State(state): State<ProductsApiState>,
    Query(params): Query<ListParams>,
) -> Result<Json<QueryResult<ProductDto>>, ApiError> {
    let query = validate(&params).map_err(ApiError::validation)?;

    let page = product::list_products(state.database.pool(), &query)
        .await
        .map_err(ApiError::from_sqlite)?;

    Ok(Json(map_page(page, ProductDto::from)))
}

/// Create a new product in an existing store
#[utoipa::path(
    post,
    path = "/api/v1/products",
    tag = "products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductDto),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Store not found")
    )
)]
pub async fn create_product(
    State(state): State<ProductsApiState>,
    ValidatedJson(body): ValidatedJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductDto>), ApiError> {
    store::get_store(state.database.pool(), &body.store_id)
        .await
        .map_err(ApiError::from_sqlite)?
        .ok_or_else(|| {
            ApiError::not_found(
                "STORE_NOT_FOUND",
                format!("Store not found: {}", body.store_id),
            )
        })?;

    let row = product::create_product(state.database.pool(), &body.into_new_product())
        .await
        .map_err(ApiError::from_sqlite)?;

    Ok((StatusCode::CREATED, Json(ProductDto::from(row))))
}

/// Get a single product by ID
#[utoipa::path(
    get,
    path = "/api/v1/products/{product_id}",
    tag = "products",
    params(
        ("product_id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product details", body = ProductDto),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    State(state): State<ProductsApiState>,
    Path(product_id): Path<String>,
) -> Result<Json<ProductDto>, ApiError> {
    let row = product::get_product(state.database.pool(), &product_id)
        .await
        .map_err(ApiError::from_sqlite)?
        .ok_or_else(|| {
            ApiError::not_found(
                "PRODUCT_NOT_FOUND",
                format!("Product not found: {}", product_id),
            )
        })?;

    Ok(Json(ProductDto::from(row)))
}

/// Apply a partial update to a product
#[utoipa::path(
    put,
    path = "/api/v1/products/{product_id}",
    tag = "products",
    params(
        ("product_id" = String, Path, description = "Product ID")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductDto),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update_product(
    State(state): State<ProductsApiState>,
    Path(product_id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateProductRequest>,
) -> Result<Json<ProductDto>, ApiError> {
    let row = product::update_product(state.database.pool(), &product_id, &body.into_changes())
        .await
        .map_err(ApiError::from_sqlite)?
        .ok_or_else(|| {
            ApiError::not_found(
                "PRODUCT_NOT_FOUND",
                format!("Product not found: {}", product_id),
            )
        })?;

    Ok(Json(ProductDto::from(row)))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/api/v1/products/{product_id}",
    tag = "products",
    params(
        ("product_id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete_product(
    State(state): State<ProductsApiState>,
    Path(product_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let deleted = product::delete_product(state.database.pool(), &product_id)
        .await
        .map_err(ApiError::from_sqlite)?;

    if !deleted {
        return Err(ApiError::not_found(
            "PRODUCT_NOT_FOUND",
            format!("Product not found: {}", product_id),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}
