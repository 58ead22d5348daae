//! Bookshelf Backend
//!
//! Entry point: load configuration, open the database, serve GraphQL at /graphql.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookshelf::cli::CliOptions;
use bookshelf::config::Config;
use bookshelf::db::Database;
use bookshelf::{AppState, build_app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookshelf=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let options = CliOptions::from_args();
    let config = Arc::new(Config::from_env_and_args(&options)?);
    tracing::info!(run_mode = ?config.run_mode, "Starting Bookshelf Backend");

    // A database we cannot reach is the one fatal startup error
    let db = Database::connect(&config.database_url)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Database connection failed"))?
        .with_bcrypt_cost(config.bcrypt_cost);
    db.migrate().await?;
    tracing::info!("Database connected");

    let state = AppState::new(config.clone(), db)?;
    let app = build_app(state);

    if config.run_mode.is_production() {
        tracing::info!(static_dir = %config.static_dir, "Serving client bundle");
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("API server running on port {}", config.port);
    tracing::info!("GraphQL available at http://localhost:{}/graphql", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
