//! Bookshelf backend
//!
//! GraphQL server for searching the Google Books catalog and keeping a
//! personal list of saved books. All operations go through `/graphql`.

pub mod api;
pub mod app;
pub mod app_mode;
pub mod cli;
pub mod config;
pub mod db;
pub mod graphql;
pub mod services;
#[cfg(feature = "embed-frontend")]
pub mod static_assets;

pub use app::{AppState, build_app};
