//! Error types for user storage operations

use thiserror::Error;

/// Result type for user storage operations
pub type UserStorageResult<T> = Result<T, UserStorageError>;

/// Errors that can occur during user storage operations
#[derive(Error, Debug)]
pub enum UserStorageError {
    /// Failed to open the connection pool
    #[error("Failed to connect to database: {0}")]
    ConnectionError(String),

    /// Failed to create the users schema
    #[error("Failed to create users schema: {0}")]
    SchemaError(String),

    /// Any error returned by the storage engine
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}
