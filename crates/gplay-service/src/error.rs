//! Error types for the fixture backend.

use gplay_dispatch::ServiceError;
use thiserror::Error;

/// Errors that can occur while reading fixture data.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// No fixture file exists for the requested resource
    #[error("{kind} '{id}' not found")]
    NotFound {
        /// Resource kind (`app`, `search`, ...)
        kind: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// Fixture file exists but does not hold the expected JSON
    #[error("invalid fixture {path}: {reason}")]
    Parse {
        /// Path to the fixture file
        path: String,
        /// What was wrong with it
        reason: String,
    },

    /// Sort order other than NEWEST, RATING or RELEVANT
    #[error("unsupported sort order '{0}'")]
    InvalidSort(String),

    /// Asset size other than SMALL, MEDIUM, LARGE or ORIGINAL
    #[error("unsupported asset size '{0}'")]
    InvalidAssets(String),

    /// I/O error while reading a fixture
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for fixture operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

impl From<CatalogError> for ServiceError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound { kind, id } => ServiceError::NotFound {
                resource: format!("{kind} '{id}'"),
            },
            err @ CatalogError::Parse { .. } => ServiceError::Parse(err.to_string()),
            err @ (CatalogError::InvalidSort(_) | CatalogError::InvalidAssets(_)) => {
                ServiceError::InvalidArgument(err.to_string())
            }
            CatalogError::Io(err) => ServiceError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_mapping() {
        let err: ServiceError = CatalogError::NotFound {
            kind: "app",
            id: "com.example".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "app 'com.example' not found");

        let err: ServiceError = CatalogError::InvalidSort("OLDEST".to_string()).into();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
        assert_eq!(err.to_string(), "invalid argument: unsupported sort order 'OLDEST'");

        let err: ServiceError =
            CatalogError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk")).into();
        assert!(!err.is_domain());
    }
}
