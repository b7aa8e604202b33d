//! Application configuration loaded from environment variables.

use crate::errors::{LedgerError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite database file
    pub database_url: String,
    /// Maximum number of pooled connections
    pub max_connections: u32,
}

impl Config {
    /// Read configuration from the process environment, picking up an
    /// optional `.env` file first (ignored if missing).
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        Ok(Config {
            database_url: env_var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./commission_ledger.db".to_string()),
            max_connections: env_var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| {
                    LedgerError::Config("Invalid DATABASE_MAX_CONNECTIONS".to_string())
                })?,
        })
    }
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| LedgerError::Config(format!("Missing env var: {key}")))
}
