//! Error types for colorcode

use thiserror::Error;

/// Result type alias for colorcode operations
pub type Result<T> = std::result::Result<T, ColorCodeError>;

/// Errors raised outside the formatting path (bundle loading, CLI)
#[derive(Error, Debug)]
pub enum ColorCodeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Syntax bundle not found: {0}")]
    BundleNotFound(String),

    #[error("Invalid syntax bundle {name}: {message}")]
    InvalidBundle { name: String, message: String },

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Usage(String),
}
