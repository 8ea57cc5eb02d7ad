//! Error types for the chat store

use thiserror::Error;
use uuid::Uuid;

/// Result type for chat store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in a chat store implementation
#[derive(Debug, Error)]
pub enum StoreError {
    /// Chat does not exist
    #[error("Chat not found: {0}")]
    NotFound(Uuid),

    /// Connection pool issues
    #[error("Pool error: {0}")]
    Pool(String),

    /// SQL errors, constraint violations
    #[error("Database error: {0}")]
    Database(String),

    /// Database unreachable or authentication failure
    #[error("Connection error: {0}")]
    Connection(String),

    /// Invalid input data
    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<tokio_postgres::Error> for StoreError {
    fn from(err: tokio_postgres::Error) -> Self {
        if let Some(db_error) = err.as_db_error() {
            return StoreError::Database(format!(
                "{}: {}",
                db_error.code().code(),
                db_error.message()
            ));
        }
        StoreError::Database(err.to_string())
    }
}

impl From<deadpool_postgres::PoolError> for StoreError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        StoreError::Pool(err.to_string())
    }
}
