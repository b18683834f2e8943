//! Configuration error types

use thiserror::Error;

/// Errors raised while loading or validating a [`DismissConfig`]
///
/// [`DismissConfig`]: crate::config::DismissConfig
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read dismiss config: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML or has mistyped fields
    #[error("Failed to parse dismiss config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of its allowed range
    #[error("Invalid dismiss config: {0}")]
    Invalid(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
