//! Error types for redirect resolution.

use thiserror::Error;

/// Main error type for Rerouter operations.
#[derive(Error, Debug)]
pub enum RerouterError {
    /// A required argument (URL or cache scope) was missing or blank
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A rule pattern failed to compile
    #[error("Invalid rule pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Rerouter operations.
pub type Result<T> = std::result::Result<T, RerouterError>;
