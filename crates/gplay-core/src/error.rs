//! Core error types for the GPlay gateway.
//!
//! Subsystem crates define their own error enums; this module holds the
//! errors raised by the shared vocabulary itself.

use thiserror::Error;

/// Errors raised by the shared vocabulary types.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Action name outside the fixed action set
    #[error("unsupported action '{name}'")]
    UnsupportedAction {
        /// The name as supplied by the caller
        name: String,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine config directory path
    #[error("could not determine config directory (XDG base directories not available)")]
    NoConfigDir,

    /// Explicitly requested config file is missing
    #[error("config file not found at {path}")]
    NotFound {
        /// Path where config was expected
        path: String,
    },

    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// I/O error reading config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::UnsupportedAction {
            name: "foo".to_string(),
        };
        assert_eq!(err.to_string(), "unsupported action 'foo'");

        let err = ConfigError::NoConfigDir;
        assert_eq!(
            err.to_string(),
            "could not determine config directory (XDG base directories not available)"
        );
    }
}
