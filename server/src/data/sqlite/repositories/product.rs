//! Product repository for SQLite operations

use sqlx::SqlitePool;

use crate::data::query::{SqlValue, TableQuery, fetch_page, fields};
use crate::data::sqlite::SqliteError;
use crate::data::types::{ProductRow, product_from_row};
use stockroom::table::types::QueryResult;

/// Fields for a new product row.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub store_id: String,
    pub name: String,
    pub category: String,
    pub stock_quantity: i64,
    pub price: f64,
}

/// Partial update; `None` fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub category: Option<String>,
    pub stock_quantity: Option<i64>,
    pub price: Option<f64>,
}

/// Create a new product with a generated CUID2 ID
pub async fn create_product(
    pool: &SqlitePool,
    new: &NewProduct,
) -> Result<ProductRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO products (id, store_id, name, category, stock_quantity, price, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&new.store_id)
    .bind(&new.name)
    .bind(&new.category)
    .bind(new.stock_quantity)
    .bind(new.price)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(ProductRow {
        id,
        store_id: new.store_id.clone(),
        name: new.name.clone(),
        category: new.category.clone(),
        stock_quantity: new.stock_quantity,
        price: new.price,
        created_at: now,
        updated_at: now,
    })
}

/// Get a product by ID
pub async fn get_product(pool: &SqlitePool, id: &str) -> Result<Option<ProductRow>, SqliteError> {
    let row = sqlx::query(
        "SELECT id, store_id, name, category, stock_quantity, price, created_at, updated_at \
         FROM products WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(product_from_row).transpose().map_err(Into::into)
}

/// List all products through the paginated query pipeline
pub async fn list_products(
    pool: &SqlitePool,
    query: &TableQuery,
) -> Result<QueryResult<ProductRow>, SqliteError> {
    fetch_page(pool, &fields::PRODUCTS, query, None, product_from_row).await
}

/// List one store's products through the paginated query pipeline
pub async fn list_store_products(
    pool: &SqlitePool,
    store_id: &str,
    query: &TableQuery,
) -> Result<QueryResult<ProductRow>, SqliteError> {
    fetch_page(
        pool,
        &fields::PRODUCTS,
        query,
        Some(("store_id", SqlValue::Text(store_id.to_string()))),
        product_from_row,
    )
    .await
}

/// Apply a partial update by ID. Returns the updated product if found.
pub async fn update_product(
    pool: &SqlitePool,
    id: &str,
    changes: &ProductChanges,
) -> Result<Option<ProductRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        "UPDATE products SET \
           name = COALESCE(?, name), \
           category = COALESCE(?, category), \
           stock_quantity = COALESCE(?, stock_quantity), \
           price = COALESCE(?, price), \
           updated_at = ? \
         WHERE id = ?",
    )
    .bind(changes.name.as_deref())
    .bind(changes.category.as_deref())
    .bind(changes.stock_quantity)
    .bind(changes.price)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_product(pool, id).await
}

/// Delete a product by ID. Returns true if a product was deleted.
pub async fn delete_product(pool: &SqlitePool, id: &str) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete every product belonging to a store, returning the removed count.
///
/// Takes any executor so the store-deletion cascade can run it inside its
/// transaction.
pub async fn delete_by_store_id<'e, E>(executor: E, store_id: &str) -> Result<u64, SqliteError>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let result = sqlx::query("DELETE FROM products WHERE store_id = ?")
        .bind(store_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
