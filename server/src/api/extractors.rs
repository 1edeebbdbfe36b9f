//! Validation extractors for API routes
//!
//! `ValidatedJson` and `ValidatedQuery` deserialize and then run the
//! `validator` derive checks; rejections speak the same `{errors: [...]}`
//! vocabulary as every other error response.

use std::ops::Deref;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use validator::Validate;

use super::types::{ErrorEntry, ErrorType};

/// Validation rejection with structured error response
pub enum ValidationRejection {
    /// Failed to parse query string
    Query(QueryRejection),
    /// Failed to parse JSON body
    Json(JsonRejection),
    /// Validation constraints not satisfied
    Validation(validator::ValidationErrors),
}

impl IntoResponse for ValidationRejection {
    fn into_response(self) -> Response {
        let errors = match self {
            Self::Query(rejection) => vec![ErrorEntry {
                error_type: ErrorType::Validation,
                field: None,
                code: "QUERY_PARSE_ERROR".to_string(),
                message: rejection.body_text(),
            }],
            Self::Json(rejection) => vec![ErrorEntry {
                error_type: ErrorType::Validation,
                field: None,
                code: "JSON_PARSE_ERROR".to_string(),
                message: rejection.body_text(),
            }],
            Self::Validation(errors) => flatten_validation_errors(&errors),
        };
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "errors": errors })),
        )
            .into_response()
    }
}

/// One entry per field violation, keyed by the offending field name.
fn flatten_validation_errors(errors: &validator::ValidationErrors) -> Vec<ErrorEntry> {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{}: validation failed", field));
                ErrorEntry::validation(field.to_string(), "VALIDATION_ERROR", message)
            })
        })
        .collect()
}

/// Query extractor with automatic validation.
///
/// Deserializes query parameters and validates them using the `validator`
/// crate. Returns a `ValidationRejection` on parse or validation failure.
#[derive(Debug)]
pub struct ValidatedQuery<T>(pub T);

impl<T> Deref for ValidatedQuery<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ValidationRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(ValidationRejection::Query)?;
        value.validate().map_err(ValidationRejection::Validation)?;
        Ok(Self(value))
    }
}

/// JSON body extractor with automatic validation.
///
/// Deserializes a JSON body and validates it using the `validator` crate.
/// Returns a `ValidationRejection` on parse or validation failure.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ValidationRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidationRejection::Json)?;
        value.validate().map_err(ValidationRejection::Validation)?;
        Ok(Self(value))
    }
}
