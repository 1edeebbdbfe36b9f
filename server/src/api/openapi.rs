//! OpenAPI document generation

use axum::Json;
use axum::response::IntoResponse;
use utoipa::OpenApi;

use super::routes::{dashboard, health, products, stores};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stockroom API",
        description = "Inventory management: stores, products, and dashboard aggregations"
    ),
    paths(
        health::health,
        stores::list_stores,
        stores::create_store,
        stores::get_store,
        stores::update_store,
        stores::delete_store,
        stores::list_store_products,
        products::list_products,
        products::create_product,
        products::get_product,
        products::update_product,
        products::delete_product,
        dashboard::overview,
        dashboard::stats,
        dashboard::stock_levels,
        dashboard::category_breakdown,
        dashboard::low_stock,
    ),
    components(schemas(
        health::HealthResponse,
        stores::types::StoreDto,
        stores::types::CreateStoreRequest,
        stores::types::UpdateStoreRequest,
        products::types::ProductDto,
        products::types::CreateProductRequest,
        products::types::UpdateProductRequest,
        dashboard::DashboardDto,
        dashboard::DashboardStatsDto,
        dashboard::StockLevelDto,
        dashboard::CategoryBreakdownDto,
        dashboard::LowStockProductDto,
        crate::api::types::ErrorEntry,
        crate::api::types::ErrorType,
    )),
    tags(
        (name = "health", description = "Service health"),
        (name = "stores", description = "Store CRUD and per-store product listings"),
        (name = "products", description = "Product CRUD"),
        (name = "dashboard", description = "Read-only aggregations"),
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
