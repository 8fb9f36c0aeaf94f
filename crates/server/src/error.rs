//! Error types for the server binary.

use thiserror::Error;

/// Main error type for the server.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration errors (missing credentials, invalid base URL)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Startup errors (transport failed to come up)
    #[error("Startup error: {0}")]
    Startup(String),

    /// Runtime errors (transport terminated abnormally)
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;
