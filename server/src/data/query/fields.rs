//! Field resolution and per-table query metadata
//!
//! Clients address columns by camelCase logical names; SQL uses snake_case.
//! Resolution is a fixed map per table. A name that is not in the map passes
//! through unchanged — the validator has already restricted fields to bare
//! identifiers, so an unmapped name can only miss at query time, not break
//! the statement.

/// Fixed logical-name → column map for one table.
#[derive(Debug, Clone, Copy)]
pub struct FieldMap {
    entries: &'static [(&'static str, &'static str)],
}

impl FieldMap {
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    /// Resolve a logical field name to its column, or pass it through
    /// unchanged when unmapped.
    pub fn resolve<'a>(&self, field: &'a str) -> &'a str {
        self.entries
            .iter()
            .find(|(logical, _)| *logical == field)
            .map(|(_, column)| *column)
            .unwrap_or(field)
    }
}

/// Everything the paginated executor needs to know about one table.
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub table: &'static str,
    pub select_columns: &'static str,
    pub fields: FieldMap,
    /// Columns probed by the free-text `search` param.
    pub searchable: &'static [&'static str],
    /// ORDER BY used when the request carries no sort.
    pub default_order: &'static str,
}

pub const STORE_FIELDS: FieldMap = FieldMap::new(&[
    ("id", "id"),
    ("name", "name"),
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
]);

pub const PRODUCT_FIELDS: FieldMap = FieldMap::new(&[
    ("id", "id"),
    ("storeId", "store_id"),
    ("name", "name"),
    ("category", "category"),
    ("stockQuantity", "stock_quantity"),
    ("price", "price"),
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
]);

pub const STORES: TableSpec = TableSpec {
    table: "stores",
    select_columns: "id, name, created_at, updated_at",
    fields: STORE_FIELDS,
    searchable: &["name"],
    default_order: "created_at DESC",
};

pub const PRODUCTS: TableSpec = TableSpec {
    table: "products",
    select_columns: "id, store_id, name, category, stock_quantity, price, created_at, updated_at",
    fields: PRODUCT_FIELDS,
    searchable: &["name", "category"],
    default_order: "created_at DESC",
};
