//! Error types for LaserUtils.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Step increment must be strictly positive.
    #[error("step increment must be greater than 0, got {0}")]
    InvalidStepIncrement(f64),

    /// Step size must not be negative.
    #[error("step size must not be negative, got {0}")]
    InvalidStepSize(f64),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
