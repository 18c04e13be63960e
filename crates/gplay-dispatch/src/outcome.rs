//! The tagged result of dispatching one action.

use crate::params::ParamError;
use crate::service::ServiceError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::fmt;

/// Classification of a failed dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The caller's request is malformed or incomplete
    InvalidInput,
    /// The external service reported a domain-level failure
    ServiceError,
    /// Anything unanticipated
    InternalError,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::InvalidInput => "invalid input",
            Self::ServiceError => "service error",
            Self::InternalError => "internal error",
        };
        f.write_str(label)
    }
}

/// Either a payload or a classified failure, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The service returned a payload
    Success {
        /// Structured value returned by the service
        payload: Value,
    },
    /// Dispatch failed
    Failure {
        /// Failure classification
        kind: FailureKind,
        /// Human-readable description
        message: String,
    },
}

impl Outcome {
    /// Wrap a successful payload.
    #[must_use]
    pub fn success(payload: Value) -> Self {
        Self::Success { payload }
    }

    /// Build a failure of the given kind.
    #[must_use]
    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            message: message.into(),
        }
    }

    /// Shorthand for an `InvalidInput` failure.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::failure(FailureKind::InvalidInput, message)
    }

    /// Shorthand for an `InternalError` failure.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::failure(FailureKind::InternalError, message)
    }

    /// Convert a caught panic payload into an `InternalError`.
    #[must_use]
    pub fn from_panic(panic: &(dyn Any + Send)) -> Self {
        Self::internal(panic_message(panic))
    }

    /// True for `Success`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Failure kind, if this is a failure.
    #[must_use]
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }
}

impl From<ParamError> for Outcome {
    fn from(err: ParamError) -> Self {
        Self::invalid_input(err.to_string())
    }
}

impl From<ServiceError> for Outcome {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Internal(message) => Self::internal(message),
            domain => Self::failure(FailureKind::ServiceError, domain.to_string()),
        }
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "worker panicked".to_string()
    }
}
