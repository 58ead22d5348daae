//! Application state and HTTP router construction.
//!
//! Used by [main] and by the router tests to build the Axum app.

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
#[cfg(not(feature = "embed-frontend"))]
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::config::Config;
use crate::db::Database;
use crate::graphql::{BookshelfSchema, GraphqlService, build_schema};
use crate::services::{AuthConfig, AuthService, GoogleBooksClient};

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Database,
    pub schema: BookshelfSchema,
    pub auth: AuthService,
}

impl AppState {
    /// Wire services and the GraphQL schema around an open database
    pub fn new(config: Arc<Config>, db: Database) -> Result<Self> {
        let auth = AuthService::new(db.clone(), AuthConfig::from_config(&config));
        let catalog = GoogleBooksClient::from_config(&config)?;
        let schema = build_schema(db.clone(), auth.clone(), catalog);

        Ok(Self {
            config,
            db,
            schema,
            auth,
        })
    }
}

/// Build the full Axum router: health, /graphql, layers, and in production
/// the client bundle as fallback.
pub fn build_app(state: AppState) -> Router<()> {
    let serve_client = state.config.run_mode.is_production();
    #[cfg(not(feature = "embed-frontend"))]
    let static_dir = state.config.static_dir.clone();

    let app = Router::new()
        .merge(api::health::router())
        .merge(GraphqlService::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if !serve_client {
        return app;
    }

    #[cfg(feature = "embed-frontend")]
    let app = app.fallback(crate::static_assets::embedded_fallback);

    #[cfg(not(feature = "embed-frontend"))]
    let app = {
        let index = std::path::Path::new(&static_dir).join("index.html");
        // Client-side routes such as `/saved` get index.html with a 200
        app.fallback_service(ServeDir::new(&static_dir).fallback(ServeFile::new(index)))
    };

    app
}
