//! API server initialization

use std::net::SocketAddr;

use anyhow::Result;
use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::middleware::{self, AllowedOrigins};
use super::openapi;
use super::routes::{dashboard, health, products, stores};
use crate::core::CoreApp;

pub struct ApiServer {
    app: CoreApp,
    allowed_origins: AllowedOrigins,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        let allowed_origins = AllowedOrigins::new(&app.config.server.host, app.config.server.port);
        Self {
            app,
            allowed_origins,
        }
    }

    /// Returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let Self {
            app,
            allowed_origins,
        } = self;

        // Clone shutdown before moving app
        let shutdown = app.shutdown.clone();

        let host = app.config.server.host.clone();
        let port = app.config.server.port;
        let addr = SocketAddr::new(host.parse()?, port);

        // Enveloped JSON routes; the OpenAPI document is added after the
        // layer so consumers get the raw document shape.
        let api = Router::new()
            .route("/health", get(health::health))
            .merge(stores::routes(app.database.clone()))
            .merge(products::routes(app.database.clone()))
            .merge(dashboard::routes(app.database.clone()))
            .layer(axum::middleware::from_fn(middleware::wrap_envelope))
            .route("/openapi.json", get(openapi::openapi_json));

        let router = Router::new()
            .nest("/api/v1", api)
            .layer(middleware::cors(&allowed_origins))
            .layer(TraceLayer::new_for_http())
            .fallback(middleware::handle_404);

        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, "API server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        Ok(app)
    }
}
