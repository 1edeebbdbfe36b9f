//! Store repository for SQLite operations

use sqlx::SqlitePool;

use crate::data::query::{TableQuery, fetch_page, fields};
use crate::data::sqlite::SqliteError;
use crate::data::types::{StoreRow, store_from_row};
use stockroom::table::types::QueryResult;

use super::product;

/// Create a new store with a generated CUID2 ID
pub async fn create_store(pool: &SqlitePool, name: &str) -> Result<StoreRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    sqlx::query("INSERT INTO stores (id, name, created_at, updated_at) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(name)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

    Ok(StoreRow {
        id,
        name: name.to_string(),
        created_at: now,
        updated_at: now,
    })
}

/// Get a store by ID
pub async fn get_store(pool: &SqlitePool, id: &str) -> Result<Option<StoreRow>, SqliteError> {
    let row = sqlx::query_as::<_, (String, String, i64, i64)>(
        "SELECT id, name, created_at, updated_at FROM stores WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(id, name, created_at, updated_at)| StoreRow {
        id,
        name,
        created_at,
        updated_at,
    }))
}

/// List stores through the paginated query pipeline
pub async fn list_stores(
    pool: &SqlitePool,
    query: &TableQuery,
) -> Result<QueryResult<StoreRow>, SqliteError> {
    fetch_page(pool, &fields::STORES, query, None, store_from_row).await
}

/// Update a store's name by ID. Returns the updated store if found.
pub async fn update_store(
    pool: &SqlitePool,
    id: &str,
    name: Option<&str>,
) -> Result<Option<StoreRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        "UPDATE stores SET name = COALESCE(?, name), updated_at = ? WHERE id = ?",
    )
    .bind(name)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_store(pool, id).await
}

/// Delete a store and all its products inside one transaction.
///
/// Returns the number of products removed, or `None` when the store does not
/// exist (in which case nothing is deleted, including products).
pub async fn delete_store_cascade(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<u64>, SqliteError> {
    let mut tx = pool.begin().await?;

    let products_deleted = product::delete_by_store_id(&mut *tx, id).await?;

    let result = sqlx::query("DELETE FROM stores WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(None);
    }

    tx.commit().await?;
    tracing::debug!(store_id = %id, products_deleted, "Store deleted");
    Ok(Some(products_deleted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::product::{NewProduct, create_product};

    async fn setup_test_pool() -> SqlitePool {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        sqlx::query(crate::data::sqlite::schema::SCHEMA)
            .execute(&pool)
            .await
            .unwrap();
        pool
    }

    fn widget(store_id: &str, name: &str) -> NewProduct {
        NewProduct {
            store_id: store_id.to_string(),
            name: name.to_string(),
            category: "Electronics".to_string(),
            stock_quantity: 5,
            price: 9.99,
        }
    }

    #[tokio::test]
    async fn test_create_store() {
        let pool = setup_test_pool().await;
        let store = create_store(&pool, "Main Store").await.unwrap();

        assert!(!store.id.is_empty());
        assert_eq!(store.name, "Main Store");
        assert!(store.created_at > 0);
        assert_eq!(store.created_at, store.updated_at);
    }

    #[tokio::test]
    async fn test_get_store() {
        let pool = setup_test_pool().await;
        let created = create_store(&pool, "Main Store").await.unwrap();

        let fetched = get_store(&pool, &created.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.name, "Main Store");
    }

    #[tokio::test]
    async fn test_get_store_not_found() {
        let pool = setup_test_pool().await;
        let result = get_store(&pool, "nonexistent").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_list_stores() {
        let pool = setup_test_pool().await;
        create_store(&pool, "Main Store").await.unwrap();
        create_store(&pool, "Downtown Branch").await.unwrap();

        let page = list_stores(&pool, &TableQuery::default()).await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.data.len(), 2);
    }

    #[tokio::test]
    async fn test_update_store() {
        let pool = setup_test_pool().await;
        let store = create_store(&pool, "Original Name").await.unwrap();

        let updated = update_store(&pool, &store.id, Some("Updated Name"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Updated Name");
    }

    #[tokio::test]
    async fn test_update_store_none_keeps_name() {
        let pool = setup_test_pool().await;
        let store = create_store(&pool, "Keep Me").await.unwrap();

        let updated = update_store(&pool, &store.id, None).await.unwrap().unwrap();
        assert_eq!(updated.name, "Keep Me");
    }

    #[tokio::test]
    async fn test_update_store_not_found() {
        let pool = setup_test_pool().await;
        let updated = update_store(&pool, "nonexistent", Some("X")).await.unwrap();
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn test_delete_store_cascade_removes_all_products() {
        let pool = setup_test_pool().await;
        let store = create_store(&pool, "Main Store").await.unwrap();
        let other = create_store(&pool, "Downtown Branch").await.unwrap();

        for i in 0..3 {
            create_product(&pool, &widget(&store.id, &format!("Widget {}", i)))
                .await
                .unwrap();
        }
        create_product(&pool, &widget(&other.id, "Keeper")).await.unwrap();

        let deleted = delete_store_cascade(&pool, &store.id).await.unwrap();
        assert_eq!(deleted, Some(3));

        assert!(get_store(&pool, &store.id).await.unwrap().is_none());

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(remaining, 1);
    }

    #[tokio::test]
    async fn test_delete_missing_store_leaves_products_alone() {
        let pool = setup_test_pool().await;
        let store = create_store(&pool, "Main Store").await.unwrap();
        create_product(&pool, &widget(&store.id, "Widget")).await.unwrap();

        let deleted = delete_store_cascade(&pool, "nonexistent").await.unwrap();
        assert_eq!(deleted, None);

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(remaining, 1);
    }
}
