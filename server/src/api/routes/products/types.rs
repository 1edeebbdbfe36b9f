//! Product API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::data::sqlite::repositories::product::{NewProduct, ProductChanges};
use crate::data::types::ProductRow;

/// Product DTO for API responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub store_id: String,
    pub name: String,
    pub category: String,
    pub stock_quantity: i64,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for ProductDto {
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

/// Request body for creating a product
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 100, message = "Store ID must be 1-100 characters"))]
    pub store_id: String,

    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 100, message = "Category must be 1-100 characters"))]
    pub category: String,

    #[validate(range(min = 0, message = "Stock quantity must be >= 0"))]
    pub stock_quantity: i64,

    #[validate(range(min = 0.0, message = "Price must be >= 0"))]
    pub price: f64,
}

impl CreateProductRequest {
    pub fn into_new_product(self) -> NewProduct {
        NewProduct {
            store_id: self.store_id,
            name: self.name,
            category: self.category,
            stock_quantity: self.stock_quantity,
            price: self.price,
        }
    }
}

/// Request body for updating a product (partial)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Category must be 1-100 characters"))]
    pub category: Option<String>,

    #[validate(range(min = 0, message = "Stock quantity must be >= 0"))]
    pub stock_quantity: Option<i64>,

    #[validate(range(min = 0.0, message = "Price must be >= 0"))]
    pub price: Option<f64>,
}

impl UpdateProductRequest {
    pub fn into_changes(self) -> ProductChanges {
        ProductChanges {
            name: self.name,
            category: self.category,
            stock_quantity: self.stock_quantity,
            price: self.price,
        }
    }
}
