//! Environment-driven configuration.
//!
//! Reads `DATABASE_URL` (required) and `PGPOOL_MAX_SIZE` (optional) from the
//! process environment, loading a `.env` file first when one is present.

use crate::error::{Error, Result};

const DEFAULT_POOL_MAX_SIZE: usize = 16;

/// Runtime configuration for the data layer.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub pool_max_size: usize,
}

impl Config {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| Error::config("DATABASE_URL is not set"))?;

        let pool_max_size = match std::env::var("PGPOOL_MAX_SIZE") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| Error::config(format!("invalid PGPOOL_MAX_SIZE: {raw}")))?,
            Err(_) => DEFAULT_POOL_MAX_SIZE,
        };

        Ok(Self {
            database_url,
            pool_max_size,
        })
    }

    /// Create a connection pool sized per this configuration.
    #[cfg(feature = "pool")]
    pub fn create_pool(&self) -> Result<deadpool_postgres::Pool> {
        crate::pool::create_pool_with_config(&self.database_url, self.pool_max_size)
    }
}
