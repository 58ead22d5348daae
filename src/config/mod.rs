//! Application configuration management

use std::env;

use anyhow::{Context, Result, bail};
use uuid::Uuid;

use crate::app_mode::RunMode;
use crate::cli::CliOptions;

pub const DEFAULT_GOOGLE_BOOKS_API_URL: &str = "https://www.googleapis.com/books/v1";

/// Two hours, matching the token expiry the client expects
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 2 * 60 * 60;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// SQLite URL (`sqlite://...`) or plain file path
    pub database_url: String,

    /// JWT secret for signing and verifying tokens
    pub jwt_secret: String,

    /// Token lifetime in seconds
    pub token_lifetime_secs: i64,

    /// bcrypt cost factor for new password hashes
    pub bcrypt_cost: u32,

    /// Google Books API base URL
    pub google_books_api_url: String,

    /// Optional Google Books API key
    pub google_books_api_key: Option<String>,

    /// Directory holding the built client (served in production)
    pub static_dir: String,

    pub run_mode: RunMode,
}

impl Config {
    /// Load configuration, letting command line flags override the environment
    pub fn from_env_and_args(options: &CliOptions) -> Result<Self> {
        let run_mode = options.run_mode_override.unwrap_or_else(RunMode::from_env);
        let mut config = Self::from_env_with_mode(run_mode)?;
        if let Some(port) = options.port_override {
            config.port = port;
        }
        Ok(config)
    }

    fn from_env_with_mode(run_mode: RunMode) -> Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .or_else(|_| env::var("DATABASE_PATH"))
            .unwrap_or_else(|_| "./data/bookshelf.db".to_string());

        let jwt_secret = env::var("JWT_SECRET")
            .or_else(|_| env::var("JWT_SECRET_KEY"))
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let jwt_secret = match jwt_secret {
            Some(secret) => secret,
            None if run_mode.is_production() => {
                bail!("JWT_SECRET is required when running in production mode")
            }
            // Tokens signed with a per-process secret stop verifying on restart
            None => format!("dev-secret-{}", Uuid::new_v4()),
        };

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .context("Invalid PORT")?,

            database_url,

            jwt_secret,

            token_lifetime_secs: env::var("TOKEN_LIFETIME_SECS")
                .ok()
                .map(|s| s.parse())
                .transpose()
                .context("Invalid TOKEN_LIFETIME_SECS")?
                .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS),

            bcrypt_cost: env::var("BCRYPT_COST")
                .ok()
                .map(|s| s.parse())
                .transpose()
                .context("Invalid BCRYPT_COST")?
                .unwrap_or(bcrypt::DEFAULT_COST),

            google_books_api_url: env::var("GOOGLE_BOOKS_API_URL")
                .unwrap_or_else(|_| DEFAULT_GOOGLE_BOOKS_API_URL.to_string()),

            google_books_api_key: env::var("GOOGLE_BOOKS_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),

            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "./client/dist".to_string()),

            run_mode,
        })
    }
}
