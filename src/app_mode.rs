//! Application run modes.
//!
//! Production serves the built client next to the API and requires an
//! explicit signing secret; development does neither.

use std::env;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunMode {
    #[default]
    Development,
    Production,
}

impl RunMode {
    /// Read `RUN_MODE`, falling back to `NODE_ENV` for deployments that already set it
    pub fn from_env() -> Self {
        env::var("RUN_MODE")
            .or_else(|_| env::var("NODE_ENV"))
            .ok()
            .and_then(|v| Self::from_arg(&v))
            .unwrap_or_default()
    }

    pub fn from_arg(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Some(RunMode::Production),
            "development" | "dev" => Some(RunMode::Development),
            _ => None,
        }
    }

    pub fn is_production(self) -> bool {
        self == RunMode::Production
    }
}
