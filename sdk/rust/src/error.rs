//! Client error types

use serde::Deserialize;
use thiserror::Error;

/// One error entry from the server's `{errors: [...]}` payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorEntry {
    #[serde(rename = "type")]
    pub error_type: String,
    #[serde(default)]
    pub field: Option<String>,
    pub code: String,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response is missing the data payload")]
    MissingData,

    #[error("server returned {status}: {}", first_message(.errors))]
    Api {
        status: u16,
        errors: Vec<ApiErrorEntry>,
    },
}

fn first_message(errors: &[ApiErrorEntry]) -> &str {
    errors.first().map(|e| e.message.as_str()).unwrap_or("unknown error")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_uses_first_message() {
        let err = ClientError::Api {
            status: 400,
            errors: vec![ApiErrorEntry {
                error_type: "validation".into(),
                field: Some("pageSize".into()),
                code: "PAGE_SIZE_RANGE".into(),
                message: "pageSize must be between 1 and 1000".into(),
            }],
        };
        assert_eq!(
            err.to_string(),
            "server returned 400: pageSize must be between 1 and 1000"
        );
    }

    #[test]
    fn api_error_display_with_no_entries() {
        let err = ClientError::Api {
            status: 500,
            errors: vec![],
        };
        assert_eq!(err.to_string(), "server returned 500: unknown error");
    }
}
