//! Row shapes shared across the data layer
//!
//! Each table has exactly one row struct and one total mapping function from
//! a raw SQLite row; nothing else in the crate reads rows field-by-field.

use sqlx::Row;
use sqlx::sqlite::SqliteRow;

#[derive(Debug, Clone, PartialEq)]
pub struct StoreRow {
    pub id: String,
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductRow {
    pub id: String,
    pub store_id: String,
    pub name: String,
    pub category: String,
    pub stock_quantity: i64,
    pub price: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Map a `stores` row. Total over rows produced by the stores select list.
pub fn store_from_row(row: &SqliteRow) -> Result<StoreRow, sqlx::Error> {
    Ok(StoreRow {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Map a `products` row. Total over rows produced by the products select list.
pub fn product_from_row(row: &SqliteRow) -> Result<ProductRow, sqlx::Error> {
    Ok(ProductRow {
        id: row.try_get("id")?,
        store_id: row.try_get("store_id")?,
        name: row.try_get("name")?,
        category: row.try_get("category")?,
        stock_quantity: row.try_get("stock_quantity")?,
        price: row.try_get("price")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Aggregate totals for the dashboard stats endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStatsRow {
    pub store_count: i64,
    pub product_count: i64,
    pub total_stock_units: i64,
    pub inventory_value: f64,
    pub low_stock_count: i64,
}

/// Per-store stock totals.
#[derive(Debug, Clone, PartialEq)]
pub struct StockLevelRow {
    pub store_id: String,
    pub store_name: String,
    pub product_count: i64,
    pub total_stock: i64,
}

/// Per-category product and stock counts.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBreakdownRow {
    pub category: String,
    pub product_count: i64,
    pub total_stock: i64,
}
