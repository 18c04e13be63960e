//! Backends that produce full analysis results.

use async_trait::async_trait;
use gplay_dispatch::{Locale, ServiceResult};
use serde_json::Value;

/// A source of full analyses for the four actions.
///
/// Selective results are derived from these by [`crate::ProjectingService`],
/// so a backend only has to answer the full-analysis questions.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Full details of one app.
    async fn app(&self, app_id: &str, locale: &Locale, assets: Option<&str>)
        -> ServiceResult<Value>;

    /// Up to `count` search results.
    async fn search(&self, query: &str, count: u32, locale: &Locale) -> ServiceResult<Value>;

    /// Up to `count` reviews in the given sort order.
    async fn reviews(
        &self,
        app_id: &str,
        count: u32,
        locale: &Locale,
        sort: &str,
    ) -> ServiceResult<Value>;

    /// Up to `count` apps published by a developer.
    async fn developer(&self, developer_id: &str, count: u32, locale: &Locale)
        -> ServiceResult<Value>;
}
