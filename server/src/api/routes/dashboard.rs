//! Dashboard API endpoints
//!
//! Read-only aggregation views over stores and products.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedQuery;
use crate::api::types::ApiError;
use crate::core::constants::LOW_STOCK_THRESHOLD;
use crate::data::sqlite::SqliteService;
use crate::data::sqlite::repositories::dashboard;
use crate::data::types::{CategoryBreakdownRow, DashboardStatsRow, ProductRow, StockLevelRow};

/// Shared state for Dashboard API endpoints
#[derive(Clone)]
pub struct DashboardApiState {
    pub database: Arc<SqliteService>,
}

/// Build Dashboard API routes
pub fn routes(database: Arc<SqliteService>) -> Router<()> {
    let state = DashboardApiState { database };

    Router::new()
        .route("/dashboard", get(overview))
        .route("/dashboard/stats", get(stats))
        .route("/dashboard/stock-levels", get(stock_levels))
        .route("/dashboard/category-breakdown", get(category_breakdown))
        .route("/dashboard/low-stock", get(low_stock))
        .with_state(state)
}

/// Everything the dashboard renders in one response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDto {
    pub stats: DashboardStatsDto,
    pub stock_levels: Vec<StockLevelDto>,
    pub category_breakdown: Vec<CategoryBreakdownDto>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatsDto {
    pub store_count: u64,
    pub product_count: u64,
    pub total_stock_units: i64,
    pub inventory_value: f64,
    pub low_stock_count: u64,
}

impl From<DashboardStatsRow> for DashboardStatsDto {
    fn from(row: DashboardStatsRow) -> Self {
        Self {
            store_count: row.store_count.max(0) as u64,
            product_count: row.product_count.max(0) as u64,
            total_stock_units: row.total_stock_units,
            inventory_value: row.inventory_value,
            low_stock_count: row.low_stock_count.max(0) as u64,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockLevelDto {
    pub store_id: String,
    pub store_name: String,
    pub product_count: u64,
    pub total_stock: i64,
}

impl From<StockLevelRow> for StockLevelDto {
    fn from(row: StockLevelRow) -> Self {
        Self {
            store_id: row.store_id,
            store_name: row.store_name,
            product_count: row.product_count.max(0) as u64,
            total_stock: row.total_stock,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdownDto {
    pub category: String,
    pub product_count: u64,
    pub total_stock: i64,
}

impl From<CategoryBreakdownRow> for CategoryBreakdownDto {
    fn from(row: CategoryBreakdownRow) -> Self {
        Self {
            category: row.category,
            product_count: row.product_count.max(0) as u64,
            total_stock: row.total_stock,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LowStockProductDto {
    pub id: String,
    pub store_id: String,
    pub name: String,
    pub category: String,
    pub stock_quantity: i64,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for LowStockProductDto {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            store_id: row.store_id,
            name: row.name,
            category: row.category,
            stock_quantity: row.stock_quantity,
            price: row.price,
            created_at: DateTime::from_timestamp(row.created_at, 0).unwrap_or_else(Utc::now),
            updated_at: DateTime::from_timestamp(row.updated_at, 0).unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LowStockQuery {
    #[validate(range(min = 0, message = "Threshold must be >= 0"))]
    pub threshold: Option<i64>,
}

/// Combined dashboard view
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "dashboard",
    responses(
        (status = 200, description = "Stats, stock levels, and category breakdown together", body = DashboardDto)
    )
)]
pub async fn overview(
    State(state): State<DashboardApiState>,
) -> Result<Json<DashboardDto>, ApiError> {
    let pool = state.database.pool();

    let stats = dashboard::stats(pool).await.map_err(ApiError::from_sqlite)?;
    let levels = dashboard::stock_levels(pool)
        .await
        .map_err(ApiError::from_sqlite)?;
    let categories = dashboard::category_breakdown(pool)
        .await
        .map_err(ApiError::from_sqlite)?;

    Ok(Json(DashboardDto {
        stats: DashboardStatsDto::from(stats),
        stock_levels: levels.into_iter().map(StockLevelDto::from).collect(),
        category_breakdown: categories.into_iter().map(CategoryBreakdownDto::from).collect(),
    }))
}

/// Headline inventory totals
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/stats",
    tag = "dashboard",
    responses(
        (status = 200, description = "Store/product counts and stock value totals", body = DashboardStatsDto)
    )
)]
pub async fn stats(
    State(state): State<DashboardApiState>,
) -> Result<Json<DashboardStatsDto>, ApiError> {
    let row = dashboard::stats(state.database.pool())
        .await
        .map_err(ApiError::from_sqlite)?;
    Ok(Json(DashboardStatsDto::from(row)))
}

/// Per-store stock totals
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/stock-levels",
    tag = "dashboard",
    responses(
        (status = 200, description = "Stock totals for every store")
    )
)]
pub async fn stock_levels(
    State(state): State<DashboardApiState>,
) -> Result<Json<Vec<StockLevelDto>>, ApiError> {
    let rows = dashboard::stock_levels(state.database.pool())
        .await
        .map_err(ApiError::from_sqlite)?;
    Ok(Json(rows.into_iter().map(StockLevelDto::from).collect()))
}

/// Per-category product and stock counts
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/category-breakdown",
    tag = "dashboard",
    responses(
        (status = 200, description = "Product and stock counts per category")
    )
)]
pub async fn category_breakdown(
    State(state): State<DashboardApiState>,
) -> Result<Json<Vec<CategoryBreakdownDto>>, ApiError> {
    let rows = dashboard::category_breakdown(state.database.pool())
        .await
        .map_err(ApiError::from_sqlite)?;
    Ok(Json(rows.into_iter().map(CategoryBreakdownDto::from).collect()))
}

/// Products at or below a stock threshold
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/low-stock",
    tag = "dashboard",
    params(
        ("threshold" = Option<i64>, Query, description = "Stock threshold (default 10)")
    ),
    responses(
        (status = 200, description = "Products running low, most depleted first")
    )
)]
pub async fn low_stock(
    State(state): State<DashboardApiState>,
    ValidatedQuery(query): ValidatedQuery<LowStockQuery>,
) -> Result<Json<Vec<LowStockProductDto>>, ApiError> {
    let threshold = query.threshold.unwrap_or(LOW_STOCK_THRESHOLD);
    let rows = dashboard::low_stock(state.database.pool(), threshold)
        .await
        .map_err(ApiError::from_sqlite)?;
    Ok(Json(rows.into_iter().map(LowStockProductDto::from).collect()))
}
