//! Common error types for Joia

use thiserror::Error;

/// Common result type for Joia operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Joia services
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input, rejected before any I/O
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal service error
    #[error("Internal error: {0}")]
    Internal(String),
}
