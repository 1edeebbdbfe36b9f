//! Dashboard aggregation queries
//!
//! Read-only rollups over stores and products. These sit outside the
//! filter/pagination pipeline; each endpoint is one fixed query.

use sqlx::SqlitePool;

use crate::core::constants::LOW_STOCK_THRESHOLD;
use crate::data::sqlite::SqliteError;
use crate::data::types::{
    CategoryBreakdownRow, DashboardStatsRow, ProductRow, StockLevelRow, product_from_row,
};

/// Headline totals for the dashboard.
pub async fn stats(pool: &SqlitePool) -> Result<DashboardStatsRow, SqliteError> {
    let (store_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM stores")
        .fetch_one(pool)
        .await?;

    let (product_count, total_stock_units, inventory_value): (i64, i64, f64) = sqlx::query_as(
        "SELECT COUNT(*), COALESCE(SUM(stock_quantity), 0), COALESCE(SUM(stock_quantity * price), 0.0) \
         FROM products",
    )
    .fetch_one(pool)
    .await?;

    let (low_stock_count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM products WHERE stock_quantity <= ?")
            .bind(LOW_STOCK_THRESHOLD)
            .fetch_one(pool)
            .await?;

    Ok(DashboardStatsRow {
        store_count,
        product_count,
        total_stock_units,
        inventory_value,
        low_stock_count,
    })
}

/// Per-store product and stock totals, newest stores first.
pub async fn stock_levels(pool: &SqlitePool) -> Result<Vec<StockLevelRow>, SqliteError> {
    let rows = sqlx::query_as::<_, (String, String, i64, i64)>(
        "SELECT s.id, s.name, COUNT(p.id), COALESCE(SUM(p.stock_quantity), 0) \
         FROM stores s \
         LEFT JOIN products p ON p.store_id = s.id \
         GROUP BY s.id, s.name \
         ORDER BY s.created_at DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(store_id, store_name, product_count, total_stock)| StockLevelRow {
            store_id,
            store_name,
            product_count,
            total_stock,
        })
        .collect())
}

/// Per-category product and stock counts, largest categories first.
pub async fn category_breakdown(
    pool: &SqlitePool,
) -> Result<Vec<CategoryBreakdownRow>, SqliteError> {
    let rows = sqlx::query_as::<_, (String, i64, i64)>(
        "SELECT category, COUNT(*), COALESCE(SUM(stock_quantity), 0) \
         FROM products \
         GROUP BY category \
         ORDER BY COUNT(*) DESC, category ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(category, product_count, total_stock)| CategoryBreakdownRow {
            category,
            product_count,
            total_stock,
        })
        .collect())
}

/// Products at or below the stock threshold, most depleted first.
pub async fn low_stock(
    pool: &SqlitePool,
    threshold: i64,
) -> Result<Vec<ProductRow>, SqliteError> {
    let rows = sqlx::query(
        "SELECT id, store_id, name, category, stock_quantity, price, created_at, updated_at \
         FROM products WHERE stock_quantity <= ? \
         ORDER BY stock_quantity ASC, created_at DESC",
    )
    .bind(threshold)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(product_from_row)
        .collect::<Result<Vec<_>, _>>()
        .map_err(Into::into)
}
