//! Store API endpoints

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

use super::products::types::ProductDto;
use types::{CreateStoreRequest, StoreDto, UpdateStoreRequest};

/// Shared state for Store API endpoints
#[derive(Clone)]
pub struct StoresApiState {
    pub database: Arc<SqliteService>,
}

/// Build Store API routes
pub fn routes(database: Arc<SqliteService>) -> Router<()> {
    let state = StoresApiState { database };

    Router::new()
        .route("/stores", get(list_stores).post(create_store))
        .route(
            "/stores/{store_id}",
            get(get_store).put(update_store).delete(delete_store),
        )
        .route("/stores/{store_id}/products", get(list_store_products))
        .with_state(state)
}

/// List stores with search/filter/sort/pagination
#[utoipa::path(
    get,
    path = "/api/v1/stores",
    tag = "stores",
    params(
        ("search" = Option<String>, Query, description = "Free-text search over store names"),
        ("filters" = Option<String>, Query, description = "JSON array of filter conditions"),
        ("sort" = Option<String>, Query, description = "JSON array of sort entries; first one is honored"),
        ("page" = Option<u32>, Query, description = "Page number (1-based)"),
        ("pageSize" = Option<u32>, Query, description = "Items per page (1-1000)")
    ),
    responses(
        (status = 200, description = "One page of stores with the total match count"),
        (status = 400, description = "Invalid query parameters")
    )
)]
pub async fn list_stores(
    State(state): State<StoresApiState>,
    Query(params): Query<ListParams>,
) -> Result<Json<QueryResult<StoreDto>>, ApiError> {
    let query = validate(&params).map_err(ApiError::validation)?;

    let page = store::list_stores(state.database.pool(), &query)
        .await
        .map_err(ApiError::from_sqlite)?;

    Ok(Json(map_page(page, StoreDto::from)))
}

/// Create a new store
#[utoipa::path(
    post,
    path = "/api/v1/stores",
    tag = "stores",
    request_body = CreateStoreRequest,
    responses(
        (status = 201, description = "Store created", body = StoreDto),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn create_store(
    State(state): State<StoresApiState>,
    ValidatedJson(body): ValidatedJson<CreateStoreRequest>,
) -> Result<(StatusCode, Json<StoreDto>), ApiError> {
    let row = store::create_store(state.database.pool(), &body.name)
        .await
        .map_err(ApiError::from_sqlite)?;

    Ok((StatusCode::CREATED, Json(StoreDto::from(row))))
}

/// Get a single store by ID
#[utoipa::path(
    get,
    path = "/api/v1/stores/{store_id}",
    tag = "stores",
    params(
        ("store_id" = String, Path, description = "Store ID")
    ),
    responses(
        (status = 200, description = "Store details", body = StoreDto),
        (status = 404, description = "Store not found")
    )
)]
pub async fn get_store(
    State(state): State<StoresApiState>,
    Path(store_id): Path<String>,
) -> Result<Json<StoreDto>, ApiError> {
    let row = store::get_store(state.database.pool(), &store_id)
        .await
        .map_err(ApiError::from_sqlite)?
        .ok_or_else(|| {
            ApiError::not_found("STORE_NOT_FOUND", format!("Store not found: {}", store_id))
        })?;

    Ok(Json(StoreDto::from(row)))
}

/// Update a store's name
#[utoipa::path(
    put,
    path = "/api/v1/stores/{store_id}",
    tag = "stores",
    params(
        ("store_id" = String, Path, description = "Store ID")
    ),
    request_body = UpdateStoreRequest,
    responses(
        (status = 200, description = "Store updated", body = StoreDto),
        (status = 404, description = "Store not found")
    )
)]
pub async fn update_store(
    State(state): State<StoresApiState>,
    Path(store_id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateStoreRequest>,
) -> Result<Json<StoreDto>, ApiError> {
    let row = store::update_store(state.database.pool(), &store_id, body.name.as_deref())
        .await
        .map_err(ApiError::from_sqlite)?
        .ok_or_else(|| {
            ApiError::not_found("STORE_NOT_FOUND", format!("Store not found: {}", store_id))
        })?;

    Ok(Json(StoreDto::from(row)))
}

/// Delete a store and all its products
#[utoipa::path(
    delete,
    path = "/api/v1/stores/{store_id}",
    tag = "stores",
    params(
        ("store_id" = String, Path, description = "Store ID")
    ),
    responses(
        (status = 204, description = "Store and its products deleted"),
        (status = 404, description = "Store not found")
    )
)]
pub async fn delete_store(
    State(state): State<StoresApiState>,
    Path(store_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let deleted = store::delete_store_cascade(state.database.pool(), &store_id)
        .await
        .map_err(ApiError::from_sqlite)?;

    match deleted {
        Some(products_deleted) => {
            tracing::debug!(store_id = %store_id, products_deleted, "Store deleted via API");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(ApiError::not_found(
            "STORE_NOT_FOUND",
            format!("Store not found: {}", store_id),
        )),
    }
}

/// List one store's products with the full query contract
#[utoipa::path(
    get,
    path = "/api/v1/stores/{store_id}/products",
    tag = "stores",
    params(
        ("store_id" = String, Path, description = "Store ID"),
        ("search" = Option<String>, Query, description = "Free-text search over product names and categories"),
        ("filters" = Option<String>, Query, description = "JSON array of filter conditions"),
        ("sort" = Option<String>, Query, description = "JSON array of sort entries; first one is honored"),
        ("page" = Option<u32>, Query, description = "Page number (1-based)"),
        ("pageSize" = Option<u32>, Query, description = "Items per page (1-1000)")
    ),
    responses(
        (status = 200, description = "One page of the store's products"),
        (status = 400, description = "Invalid query parameters"),
        (status = 404, description = "Store not found")
    )
)]
pub async fn list_store_products(
    State(state): State<StoresApiState>,
    Path(store_id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<QueryResult<ProductDto>>, ApiError> {
    let query = validate(&params).map_err(ApiError::validation)?;

    store::get_store(state.database.pool(), &store_id)
        .await
        .map_err(ApiError::from_sqlite)?
        .ok_or_else(|| {
            ApiError::not_found("STORE_NOT_FOUND", format!("Store not found: {}", store_id))
        })?;

    let page = product::list_store_products(state.database.pool(), &store_id, &query)
        .await
        .map_err(ApiError::from_sqlite)?;

    Ok(Json(map_page(page, ProductDto::from)))
}
