//! HTTP middleware (CORS, response envelope, 404 handler)

use axum::body::{Body, to_bytes};
use axum::extract::Request;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::core::config::is_all_interfaces;

/// Allowed origins configuration
#[derive(Debug, Clone)]
pub struct AllowedOrigins {
    origins: Vec<String>,
}

impl AllowedOrigins {
    /// Create allowed origins from host and port configuration
    pub fn new(host: &str, port: u16) -> Self {
        let mut origins = Vec::new();
        let dev_port = port + 1;

        // When binding to all interfaces or localhost, allow both localhost
        // and 127.0.0.1; otherwise use the configured host directly.
        let base_hosts: Vec<&str> =
            if is_all_interfaces(host) || host == "127.0.0.1" || host == "localhost" {
                vec!["localhost", "127.0.0.1"]
            } else {
                vec![host]
            };

        for h in &base_hosts {
            origins.push(format!("http://{}:{}", h, port));
            origins.push(format!("http://{}:{}", h, dev_port));
            origins.push(format!("http://{}", h));
        }

        Self { origins }
    }

    /// Check if an origin is allowed
    pub fn is_allowed(&self, origin: &str) -> bool {
        self.origins.iter().any(|o| o == origin)
    }

    /// Get origins as HeaderValues for CORS
    fn as_header_values(&self) -> Vec<HeaderValue> {
        self.origins.iter().filter_map(|o| o.parse().ok()).collect()
    }
}

/// Create CORS layer
pub fn cors(allowed: &AllowedOrigins) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed.as_header_values()))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN])
        .allow_credentials(true)
}

/// Largest JSON body the envelope middleware will buffer (10MB)
const MAX_ENVELOPE_BODY: usize = 10 * 1024 * 1024;

/// Wrap every JSON response in the `{data?, errors?, meta}` envelope.
///
/// Success payloads become `data`; bodies that already carry a top-level
/// `errors` key keep it. `meta` records timestamp, path, and method for
/// every response, success or failure. Non-JSON and empty bodies (204) pass
/// through untouched.
pub async fn wrap_envelope(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let method = req.method().to_string();

    let response = next.run(req).await;

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/json"))
        .unwrap_or(false);
    if !is_json {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_ENVELOPE_BODY).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(error = %e, "Failed to buffer response body for envelope");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    if bytes.is_empty() {
        return Response::from_parts(parts, Body::empty());
    }

    let payload: serde_json::Value = match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        // Not actually JSON despite the content type; leave it alone.
        Err(_) => return Response::from_parts(parts, Body::from(bytes)),
    };

    let meta = serde_json::json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "path": path,
        "method": method,
    });

    let envelope = match &payload {
        serde_json::Value::Object(map) if map.contains_key("errors") => {
            serde_json::json!({ "errors": map["errors"], "meta": meta })
        }
        _ => serde_json::json!({ "data": payload, "meta": meta }),
    };

    let body = serde_json::to_vec(&envelope).unwrap_or_default();
    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(body))
}

/// Handle 404 Not Found with logging
pub async fn handle_404(req: Request) -> impl IntoResponse {
    tracing::debug!("[404] {} {}", req.method(), req.uri());
    StatusCode::NOT_FOUND
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_origins_cover_localhost_variants() {
        let allowed = AllowedOrigins::new("127.0.0.1", 5570);
        assert!(allowed.is_allowed("http://localhost:5570"));
        assert!(allowed.is_allowed("http://127.0.0.1:5570"));
        assert!(allowed.is_allowed("http://localhost:5571"));
        assert!(!allowed.is_allowed("http://evil.example"));
    }

    #[test]
    fn custom_host_is_used_directly() {
        let allowed = AllowedOrigins::new("stockroom.internal", 80);
        assert!(allowed.is_allowed("http://stockroom.internal:80"));
        assert!(!allowed.is_allowed("http://localhost:80"));
    }
}
