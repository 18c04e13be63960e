//! Boundary to the external Play Store service.
//!
//! The router only ever talks to the service through [`PlayStoreService`].
//! How the service fetches or parses data is its own business; the router
//! relies on two things: every call either returns a JSON payload or a
//! [`ServiceError`], and domain failures are distinguishable from
//! unexpected ones.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Language and country a call is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    /// Two-letter language code
    pub language: String,
    /// Two-letter country code
    pub country: String,
}

impl Locale {
    /// Create a locale.
    #[must_use]
    pub fn new(language: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            country: country.into(),
        }
    }
}

/// Errors reported by the external service.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The requested resource does not exist
    #[error("{resource} not found")]
    NotFound {
        /// Human-readable resource description
        resource: String,
    },

    /// Upstream throttled the request
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Upstream could not be reached
    #[error("network error: {0}")]
    Network(String),

    /// Upstream answered with data that could not be parsed
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The service rejected a parameter value
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Anything the service did not anticipate
    #[error("internal service error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// True for failures the service reports as part of its contract.
    ///
    /// Only [`ServiceError::Internal`] is not a domain failure.
    #[must_use]
    pub fn is_domain(&self) -> bool {
        !matches!(self, Self::Internal(_))
    }
}

/// Result type for service calls.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// The eight operations the router may call.
///
/// Each action has a full-analysis call and a selective call that returns
/// only the requested fields. Implementations must be thread-safe
/// (Send + Sync) since calls may run on worker tasks.
#[async_trait]
pub trait PlayStoreService: Send + Sync {
    /// Full details for one app.
    async fn app_analyze(
        &self,
        app_id: &str,
        locale: &Locale,
        assets: Option<&str>,
    ) -> ServiceResult<Value>;

    /// Selected fields for one app.
    async fn app_get_fields(
        &self,
        app_id: &str,
        fields: &[String],
        locale: &Locale,
        assets: Option<&str>,
    ) -> ServiceResult<Value>;

    /// Full search results.
    async fn search_analyze(&self, query: &str, count: u32, locale: &Locale)
        -> ServiceResult<Value>;

    /// Selected fields of each search result.
    async fn search_get_fields(
        &self,
        query: &str,
        fields: &[String],
        count: u32,
        locale: &Locale,
    ) -> ServiceResult<Value>;

    /// Full reviews for one app.
    async fn reviews_analyze(
        &self,
        app_id: &str,
        count: u32,
        locale: &Locale,
        sort: &str,
    ) -> ServiceResult<Value>;

    /// Selected fields of each review.
    async fn reviews_get_fields(
        &self,
        app_id: &str,
        fields: &[String],
        count: u32,
        locale: &Locale,
        sort: &str,
    ) -> ServiceResult<Value>;

    /// Full list of a developer's apps.
    async fn developer_analyze(
        &self,
        developer_id: &str,
        count: u32,
        locale: &Locale,
    ) -> ServiceResult<Value>;

    /// Selected fields of each developer app.
    async fn developer_get_fields(
        &self,
        developer_id: &str,
        fields: &[String],
        count: u32,
        locale: &Locale,
    ) -> ServiceResult<Value>;
}
