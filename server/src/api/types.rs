//! Shared API types
//!
//! Error taxonomy and response shapes used across all endpoints. Every error
//! response is a list of [`ErrorEntry`] items under an `errors` key; the
//! envelope middleware adds the `meta` block.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::data::sqlite::SqliteError;
use stockroom::table::types::QueryResult;

/// Error taxonomy: which class of failure produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    Validation,
    NotFound,
    Db,
    InternalServerError,
}

/// One machine-readable error: `{type, field, code, message}`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ErrorEntry {
    #[serde(rename = "type")]
    pub error_type: ErrorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub code: String,
    pub message: String,
}

impl ErrorEntry {
    pub fn validation(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error_type: ErrorType::Validation,
            field: Some(field.into()),
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_type: ErrorType::NotFound,
            field: None,
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Standard API error response: an HTTP status plus one or more entries.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    errors: Vec<ErrorEntry>,
}

impl ApiError {
    /// 400 with one entry per violated rule.
    pub fn validation(errors: Vec<ErrorEntry>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            errors,
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            errors: vec![ErrorEntry::not_found(code, message)],
        }
    }

    /// 500 with an opaque entry; the underlying error is logged, not leaked.
    pub fn from_sqlite(e: SqliteError) -> Self {
        tracing::error!(error = %e, "SQLite error");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            errors: vec![ErrorEntry {
                error_type: ErrorType::Db,
                field: None,
                code: "DB_ERROR".to_string(),
                message: "Database operation failed".to_string(),
            }],
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            errors: vec![ErrorEntry {
                error_type: ErrorType::InternalServerError,
                field: None,
                code: "INTERNAL".to_string(),
                message: message.into(),
            }],
        }
    }

    pub fn errors(&self) -> &[ErrorEntry] {
        &self.errors
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "errors": self.errors })),
        )
            .into_response()
    }
}

/// Map a page of rows to a page of DTOs, preserving the page metadata.
pub fn map_page<T, U>(page: QueryResult<T>, f: impl Fn(T) -> U) -> QueryResult<U> {
    QueryResult {
        data: page.data.into_iter().map(f).collect(),
        total: page.total,
        page: page.page,
        page_size: page.page_size,
    }
}
