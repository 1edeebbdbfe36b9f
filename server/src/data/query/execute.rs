//! Paginated query execution
//!
//! Combines the compiled WHERE clause with ORDER BY/LIMIT/OFFSET generation
//! and a count query to produce one page of rows plus the total match count.
//!
//! The count and data queries run as two sequential statements on the pool
//! with no wrapping transaction; under concurrent writes the total can drift
//! from the page contents by whatever SQLite's default isolation allows.

use sqlx::SqlitePool;
use sqlx::sqlite::SqliteRow;

use stockroom::table::types::QueryResult;

use super::compile::{SqlParams, SqlValue, compile_filters, compile_search};
use super::fields::TableSpec;
use super::validate::TableQuery;
use crate::data::sqlite::SqliteError;

/// Fetch one page of rows plus the unpaginated match count.
///
/// `scope` is an extra `column = ?` condition for nested listings (products
/// of one store). `map_row` is the table's row-to-entity function. The
/// response echoes the validated, defaulted `page`/`page_size` from `query`.
pub async fn fetch_page<T>(
    pool: &SqlitePool,
    spec: &TableSpec,
    query: &TableQuery,
    scope: Option<(&'static str, SqlValue)>,
    map_row: fn(&SqliteRow) -> Result<T, sqlx::Error>,
) -> Result<QueryResult<T>, SqliteError> {
    let mut params = SqlParams::default();
    let mut conditions: Vec<String> = Vec::new();

    if let Some((column, value)) = scope {
        params.values.push(value);
        conditions.push(format!("{} = ?", column));
    }

    if let Some(ref term) = query.search {
        conditions.push(compile_search(term, spec.searchable, &mut params));
    }

    let compiled = compile_filters(&query.filters, &spec.fields, &mut params);
    for (field, reason) in &compiled.skipped {
        tracing::debug!(table = spec.table, field = %field, reason = %reason, "Filter condition skipped");
    }
    if !compiled.sql.is_empty() {
        conditions.push(compiled.sql);
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    // Only the first sort entry is honored; direction is normalized upstream
    // but upper-cased here for the statement text.
    let order_by = match query.sort.first() {
        Some(sort) => format!(
            "{} {}",
            spec.fields.resolve(&sort.id),
            sort.direction.as_str().to_uppercase()
        ),
        None => spec.default_order.to_string(),
    };

    let count_sql = format!("SELECT COUNT(*) FROM {}{}", spec.table, where_clause);
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for value in &params.values {
        count_query = match value {
            SqlValue::Text(s) => count_query.bind(s.as_str()),
            SqlValue::Number(n) => count_query.bind(*n),
        };
    }
    let total = count_query.fetch_one(pool).await?;

    let offset = (i64::from(query.page) - 1) * i64::from(query.page_size);
    let data_sql = format!(
        "SELECT {} FROM {}{} ORDER BY {} LIMIT ? OFFSET ?",
        spec.select_columns, spec.table, where_clause, order_by
    );
    let mut data_query = sqlx::query(&data_sql);
    for value in &params.values {
        data_query = match value {
            SqlValue::Text(s) => data_query.bind(s.as_str()),
            SqlValue::Number(n) => data_query.bind(*n),
        };
    }
    let rows = data_query
        .bind(i64::from(query.page_size))
        .bind(offset)
        .fetch_all(pool)
        .await?;

    let data = rows.iter().map(map_row).collect::<Result<Vec<T>, _>>()?;

    Ok(QueryResult {
        data,
        total: total as u64,
        page: query.page,
        page_size: query.page_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::query::fields::{PRODUCTS, STORES};
    use crate::data::query::validate::{ListParams, validate};
    use crate::data::types::{product_from_row, store_from_row};
    use stockroom::table::types::SortSpec;

    async fn seeded_pool() -> SqlitePool {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        sqlx::query(crate::data::sqlite::schema::SCHEMA)
            .execute(&pool)
            .await
            .unwrap();

        // Distinct created_at values so ordering is deterministic.
        for (id, name, ts) in [
            ("s1", "Main Store", 1_000),
            ("s2", "Downtown Branch", 2_000),
            ("s3", "Harbor Outlet", 3_000),
        ] {
            sqlx::query(
                "INSERT INTO stores (id, name, created_at, updated_at) VALUES (?, ?, ?, ?)",
            )
            .bind(id)
            .bind(name)
            .bind(ts)
            .bind(ts)
            .execute(&pool)
            .await
            .unwrap();
        }

        for (id, store, name, category, qty, price, ts) in [
            ("p1", "s1", "Phone", "Electronics", 12, 599.0, 1_100),
            ("p2", "s1", "Laptop", "Electronics", 5, 1299.0, 1_200),
            ("p3", "s2", "Headphones", "Electronics", 40, 199.0, 1_300),
            ("p4", "s2", "Desk Lamp", "Furniture", 7, 39.5, 1_400),
            ("p5", "s3", "Office Chair", "Furniture", 3, 249.0, 1_500),
        ] {
            sqlx::query(
                "INSERT INTO products (id, store_id, name, category, stock_quantity, price, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(id)
            .bind(store)
            .bind(name)
            .bind(category)
            .bind(qty)
            .bind(price)
            .bind(ts)
            .bind(ts)
            .execute(&pool)
            .await
            .unwrap();
        }

        pool
    }

    #[tokio::test]
    async fn no_sort_falls_back_to_created_at_desc() {
        let pool = seeded_pool().await;
        let query = TableQuery::default();
        let page = fetch_page(&pool, &STORES, &query, None, store_from_row)
            .await
            .unwrap();

        let ids: Vec<&str> = page.data.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s3", "s2", "s1"]);
        assert_eq!(page.total, 3);
    }

    #[tokio::test]
    async fn only_first_sort_entry_is_honored() {
        let pool = seeded_pool().await;
        let query = TableQuery {
            sort: vec![SortSpec::asc("price"), SortSpec::desc("name")],
            ..Default::default()
        };
        let page = fetch_page(&pool, &PRODUCTS, &query, None, product_from_row)
            .await
            .unwrap();

        let ids: Vec<&str> = page.data.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p4", "p3", "p5", "p1", "p2"]);
    }

    #[tokio::test]
    async fn sort_field_goes_through_the_resolver() {
        let pool = seeded_pool().await;
        let query = TableQuery {
            sort: vec![SortSpec::desc("stockQuantity")],
            ..Default::default()
        };
        let page = fetch_page(&pool, &PRODUCTS, &query, None, product_from_row)
            .await
            .unwrap();
        assert_eq!(page.data[0].id, "p3");
        assert_eq!(page.data[0].stock_quantity, 40);
    }

    #[tokio::test]
    async fn end_to_end_filter_page_echoes_validated_inputs() {
        let pool = seeded_pool().await;
        let params = ListParams {
            filters: Some(
                r#"[{"field":"category","operator":"equals","value":"Electronics"}]"#.into(),
            ),
            page: Some("1".into()),
            page_size: Some("2".into()),
            ..Default::default()
        };
        let query = validate(&params).unwrap();
        let page = fetch_page(&pool, &PRODUCTS, &query, None, product_from_row)
            .await
            .unwrap();

        assert_eq!(page.data.len(), 2);
        assert_eq!(page.total, 3);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 2);
        assert!(page.data.iter().all(|p| p.category == "Electronics"));
    }

    #[tokio::test]
    async fn second_page_returns_the_remainder() {
        let pool = seeded_pool().await;
        let params = ListParams {
            filters: Some(
                r#"[{"field":"category","operator":"equals","value":"Electronics"}]"#.into(),
            ),
            page: Some("2".into()),
            page_size: Some("2".into()),
            ..Default::default()
        };
        let query = validate(&params).unwrap();
        let page = fetch_page(&pool, &PRODUCTS, &query, None, product_from_row)
            .await
            .unwrap();

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.total, 3);
        assert_eq!(page.page, 2);
    }

    #[tokio::test]
    async fn search_probes_name_and_category() {
        let pool = seeded_pool().await;
        let query = TableQuery {
            search: Some("furn".into()),
            ..Default::default()
        };
        let page = fetch_page(&pool, &PRODUCTS, &query, None, product_from_row)
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        assert!(page.data.iter().all(|p| p.category == "Furniture"));
    }

    #[tokio::test]
    async fn scope_restricts_to_one_store() {
        let pool = seeded_pool().await;
        let query = TableQuery::default();
        let page = fetch_page(
            &pool,
            &PRODUCTS,
            &query,
            Some(("store_id", SqlValue::Text("s2".into()))),
            product_from_row,
        )
        .await
        .unwrap();

        assert_eq!(page.total, 2);
        assert!(page.data.iter().all(|p| p.store_id == "s2"));
    }

    #[tokio::test]
    async fn numeric_comparison_filter() {
        let pool = seeded_pool().await;
        let params = ListParams {
            filters: Some(
                r#"[{"field":"stockQuantity","operator":"less_than_or_equal","value":7}]"#.into(),
            ),
            ..Default::default()
        };
        let query = validate(&params).unwrap();
        let page = fetch_page(&pool, &PRODUCTS, &query, None, product_from_row)
            .await
            .unwrap();
        assert_eq!(page.total, 3);
        assert!(page.data.iter().all(|p| p.stock_quantity <= 7));
    }

    #[tokio::test]
    async fn in_filter_matches_listed_categories() {
        let pool = seeded_pool().await;
        let params = ListParams {
            filters: Some(r#"[{"field":"category","operator":"in","value":["Furniture"]}]"#.into()),
            ..Default::default()
        };
        let query = validate(&params).unwrap();
        let page = fetch_page(&pool, &PRODUCTS, &query, None, product_from_row)
            .await
            .unwrap();
        assert_eq!(page.total, 2);
    }

    #[tokio::test]
    async fn unknown_pass_through_field_misses_without_breaking() {
        // An unmapped (but identifier-safe) field reaches SQL unchanged and
        // simply fails to match a column — the statement itself must error,
        // which surfaces as a database error, not a panic.
        let pool = seeded_pool().await;
        let query = TableQuery {
            filters: vec![stockroom::table::types::Filter::new(
                "warehouse",
                stockroom::table::types::FilterOperator::Equals,
                stockroom::table::types::FilterValue::Scalar(
                    stockroom::table::types::Scalar::Text("x".into()),
                ),
            )],
            ..Default::default()
        };
        let result = fetch_page(&pool, &PRODUCTS, &query, None, product_from_row).await;
        assert!(result.is_err());
    }
}
