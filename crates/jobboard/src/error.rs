//! Error types for jobboard

use thiserror::Error;

/// Result type alias for jobboard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the data layer
#[derive(Debug, Error)]
pub enum Error {
    /// Caller error, surfaced by the consuming API as a 400-class response
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Lookup, update, delete, or filtered list matched no row where one was required
    #[error("Not found: {0}")]
    NotFound(String),

    /// A create collided with an existing natural key
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Referenced row does not exist
    #[error("Foreign key violation: {0}")]
    ForeignKey(String),

    /// Check constraint violation (e.g. negative salary)
    #[error("Check constraint violation: {0}")]
    Check(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Missing or invalid environment configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Migration error
    #[cfg(feature = "migrate")]
    #[error("Migration error: {0}")]
    Migration(String),
}

impl Error {
    /// Create a bad-request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is a bad-request error
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Self::BadRequest(_))
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Parse a tokio_postgres error into a more specific Error.
    ///
    /// Constraint violations carry SQLSTATE codes; `23505` is how `create`
    /// detects a natural-key collision without a separate duplicate-check
    /// round trip.
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::Conflict(format!("{}: {}", constraint, message)),
                "23503" => return Self::ForeignKey(format!("{}: {}", constraint, message)),
                "23514" => return Self::Check(format!("{}: {}", constraint, message)),
                _ => {}
            }
        }
        Self::Query(err)
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for Error {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

#[cfg(feature = "migrate")]
impl From<refinery::Error> for Error {
    fn from(err: refinery::Error) -> Self {
        Self::Migration(err.to_string())
    }
}
