//! Typed HTTP client for the Stockroom API
//!
//! List calls take a [`TableState`] and go through the query-parameter codec,
//! so the SDK exercises exactly the wire contract the server validates.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ApiErrorEntry, ClientError};
use crate::models::{
    CategoryBreakdown, CreateProductRequest, CreateStoreRequest, Dashboard, DashboardStats,
    Health, Product, StockLevel, Store, UpdateProductRequest, UpdateStoreRequest,
};
use crate::table::codec;
use crate::table::state::TableState;
use crate::table::types::QueryResult;

/// Response envelope: `{data?, errors?, meta}`. `meta` is ignored here.
#[derive(Debug, serde::Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<ApiErrorEntry>,
}

/// Stockroom API client.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    http: reqwest::Client,
}

impl Client {
    /// Create a client for a server base URL (e.g. `http://127.0.0.1:5570`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    /// Use a preconfigured `reqwest::Client` (timeouts, proxies).
    pub fn with_http(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    async fn expect_data<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        let envelope: Envelope<T> = serde_json::from_slice(&body)?;

        if !(200..300).contains(&status) {
            return Err(ClientError::Api {
                status,
                errors: envelope.errors,
            });
        }
        envelope.data.ok_or(ClientError::MissingData)
    }

    async fn expect_no_content(response: reqwest::Response) -> Result<(), ClientError> {
        let status = response.status().as_u16();
        if (200..300).contains(&status) {
            return Ok(());
        }
        let body = response.bytes().await?;
        let errors = serde_json::from_slice::<Envelope<serde_json::Value>>(&body)
            .map(|e| e.errors)
            .unwrap_or_default();
        Err(ClientError::Api { status, errors })
    }

    async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.http.get(self.url(path)).send().await?;
        Self::expect_data(response).await
    }

    async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        state: &TableState,
    ) -> Result<QueryResult<T>, ClientError> {
        let params = codec::encode(state);
        let response = self
            .http
            .get(self.url(path))
            .query(&params.to_query_pairs())
            .send()
            .await?;
        Self::expect_data(response).await
    }

    async fn post_data<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Self::expect_data(response).await
    }

    async fn put_data<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self.http.put(self.url(path)).json(body).send().await?;
        Self::expect_data(response).await
    }

    async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let response = self.http.delete(self.url(path)).send().await?;
        Self::expect_no_content(response).await
    }

    // ------------------------------------------------------------------
    // Health
    // ------------------------------------------------------------------

    pub async fn health(&self) -> Result<Health, ClientError> {
        self.get_data("/health").await
    }

    // ------------------------------------------------------------------
    // Stores
    // ------------------------------------------------------------------

    pub async fn list_stores(&self, state: &TableState) -> Result<QueryResult<Store>, ClientError> {
        self.list("/stores", state).await
    }

    pub async fn get_store(&self, id: &str) -> Result<Store, ClientError> {
        self.get_data(&format!("/stores/{}", id)).await
    }

    pub async fn create_store(&self, request: &CreateStoreRequest) -> Result<Store, ClientError> {
        self.post_data("/stores", request).await
    }

    pub async fn update_store(
        &self,
        id: &str,
        request: &UpdateStoreRequest,
    ) -> Result<Store, ClientError> {
        self.put_data(&format!("/stores/{}", id), request).await
    }

    pub async fn delete_store(&self, id: &str) -> Result<(), ClientError> {
        self.delete(&format!("/stores/{}", id)).await
    }

    /// Products belonging to one store, with the full query contract.
    pub async fn store_products(
        &self,
        store_id: &str,
        state: &TableState,
    ) -> Result<QueryResult<Product>, ClientError> {
        self.list(&format!("/stores/{}/products", store_id), state).await
    }

    // ------------------------------------------------------------------
    // Products
    // ------------------------------------------------------------------

    pub async fn list_products(
        &self,
        state: &TableState,
    ) -> Result<QueryResult<Product>, ClientError> {
        self.list("/products", state).await
    }

    pub async fn get_product(&self, id: &str) -> Result<Product, ClientError> {
        self.get_data(&format!("/products/{}", id)).await
    }

    pub async fn create_product(
        &self,
        request: &CreateProductRequest,
    ) -> Result<Product, ClientError> {
        self.post_data("/products", request).await
    }

    pub async fn update_product(
        &self,
        id: &str,
        request: &UpdateProductRequest,
    ) -> Result<Product, ClientError> {
        self.put_data(&format!("/products/{}", id), request).await
    }

    pub async fn delete_product(&self, id: &str) -> Result<(), ClientError> {
        self.delete(&format!("/products/{}", id)).await
    }

    // ------------------------------------------------------------------
    // Dashboard
    // ------------------------------------------------------------------

    pub async fn dashboard(&self) -> Result<Dashboard, ClientError> {
        self.get_data("/dashboard").await
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ClientError> {
        self.get_data("/dashboard/stats").await
    }

    pub async fn stock_levels(&self) -> Result<Vec<StockLevel>, ClientError> {
        self.get_data("/dashboard/stock-levels").await
    }

    pub async fn category_breakdown(&self) -> Result<Vec<CategoryBreakdown>, ClientError> {
        self.get_data("/dashboard/category-breakdown").await
    }

    pub async fn low_stock(&self, threshold: i64) -> Result<Vec<Product>, ClientError> {
        let response = self
            .http
            .get(self.url("/dashboard/low-stock"))
            .query(&[("threshold", threshold.to_string())])
            .send()
            .await?;
        Self::expect_data(response).await
    }
}
