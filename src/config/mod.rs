//! Environment-sourced configuration

use anyhow::{Result, anyhow};

/// The port the service listens on.
pub const LISTEN_PORT: u16 = 3000;

const DEFAULT_DATABASE: &str = "bicycle-repair";

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// MongoDB connection string
    pub mongo_uri: String,

    /// Database name; defaults to `bicycle-repair`
    pub database_name: String,

    /// Secret used to sign and verify bearer tokens
    pub token_secret: String,
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// `MONGO_URI` and `TOKEN_SECRET` are required; `DATABASE_NAME` is
    /// optional.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            mongo_uri: require_var("MONGO_URI")?,
            database_name: std::env::var("DATABASE_NAME")
                .unwrap_or_else(|_| DEFAULT_DATABASE.to_string()),
            token_secret: require_var("TOKEN_SECRET")?,
        })
    }
}

fn require_var(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| anyhow!("required environment variable {name} is not set"))
}
