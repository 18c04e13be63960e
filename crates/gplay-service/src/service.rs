//! [`PlayStoreService`] built on top of an [`Analyzer`].

use crate::analyzer::Analyzer;
use crate::cache::{AppCache, AppKey};
use crate::projection::project;
use async_trait::async_trait;
use gplay_dispatch::{Locale, PlayStoreService, ServiceResult};
use serde_json::Value;
use tracing::debug;

/// Serves every operation from an analyzer's full results.
///
/// Selective calls run the matching full analysis and project the
/// requested fields out of it. Full app analyses are optionally cached so
/// repeated field lookups on one app do not hit the backend again.
pub struct ProjectingService<A> {
    analyzer: A,
    cache: Option<AppCache>,
}

impl<A: Analyzer> ProjectingService<A> {
    /// Wrap an analyzer, caching app analyses.
    #[must_use]
    pub fn new(analyzer: A) -> Self {
        Self {
            analyzer,
            cache: Some(AppCache::new()),
        }
    }

    /// Wrap an analyzer without any caching.
    #[must_use]
    pub fn uncached(analyzer: A) -> Self {
        Self {
            analyzer,
            cache: None,
        }
    }

    /// Wrap an analyzer, caching app analyses only when `cache_apps` is set.
    #[must_use]
    pub fn with_cache(analyzer: A, cache_apps: bool) -> Self {
        if cache_apps {
            Self::new(analyzer)
        } else {
            Self::uncached(analyzer)
        }
    }

    /// The wrapped analyzer.
    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }

    /// Number of cached app analyses.
    #[must_use]
    pub fn cached_apps(&self) -> usize {
        self.cache.as_ref().map_or(0, AppCache::len)
    }

    async fn analyze_app(
        &self,
        app_id: &str,
        locale: &Locale,
        assets: Option<&str>,
    ) -> ServiceResult<Value> {
        let Some(cache) = &self.cache else {
            return self.analyzer.app(app_id, locale, assets).await;
        };

        let key = AppKey::new(app_id, locale, assets);
        if let Some(hit) = cache.get(&key) {
            debug!(app_id, "app analysis cache hit");
            return Ok(hit);
        }

        let value = self.analyzer.app(app_id, locale, assets).await?;
        cache.insert(key, value.clone());
        Ok(value)
    }
}

#[async_trait]
impl<A: Analyzer> PlayStoreService for ProjectingService<A> {
    async fn app_analyze(
        &self,
        app_id: &str,
        locale: &Locale,
        assets: Option<&str>,
    ) -> ServiceResult<Value> {
        self.analyze_app(app_id, locale, assets).await
    }

    async fn app_get_fields(
        &self,
        app_id: &str,
        fields: &[String],
        locale: &Locale,
        assets: Option<&str>,
    ) -> ServiceResult<Value> {
        let app = self.analyze_app(app_id, locale, assets).await?;
        Ok(project(&app, fields))
    }

    async fn search_analyze(&self, query: &str, count: u32, locale: &Locale) -> ServiceResult<Value> {
        self.analyzer.search(query, count, locale).await
    }

    async fn search_get_fields(
        &self,
        query: &str,
        fields: &[String],
        count: u32,
        locale: &Locale,
    ) -> ServiceResult<Value> {
        let results = self.analyzer.search(query, count, locale).await?;
        Ok(project(&results, fields))
    }

    async fn reviews_analyze(
        &self,
        app_id: &str,
        count: u32,
        locale: &Locale,
        sort: &str,
    ) -> ServiceResult<Value> {
        self.analyzer.reviews(app_id, count, locale, sort).await
    }

    async fn reviews_get_fields(
        &self,
        app_id: &str,
        fields: &[String],
        count: u32,
        locale: &Locale,
        sort: &str,
    ) -> ServiceResult<Value> {
        let reviews = self.analyzer.reviews(app_id, count, locale, sort).await?;
        Ok(project(&reviews, fields))
    }

    async fn developer_analyze(
        &self,
        developer_id: &str,
        count: u32,
        locale: &Locale,
    ) -> ServiceResult<Value> {
        self.analyzer.developer(developer_id, count, locale).await
    }

    async fn developer_get_fields(
        &self,
        developer_id: &str,
        fields: &[String],
        count: u32,
        locale: &Locale,
    ) -> ServiceResult<Value> {
        let apps = self.analyzer.developer(developer_id, count, locale).await?;
        Ok(project(&apps, fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gplay_dispatch::ServiceError;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Default)]
    struct CountingAnalyzer {
        app_calls: AtomicU32,
    }

    #[async_trait]
    impl Analyzer for CountingAnalyzer {
        async fn app(
            &self,
            app_id: &str,
            _locale: &Locale,
            _assets: Option<&str>,
        ) -> ServiceResult<Value> {
            self.app_calls.fetch_add(1, Ordering::SeqCst);
            if app_id == "missing" {
                return Err(ServiceError::NotFound {
                    resource: "app 'missing'".to_string(),
                });
            }
            Ok(json!({"appId": app_id, "title": "Chess", "score": 4.5}))
        }

        async fn search(&self, _query: &str, count: u32, _locale: &Locale) -> ServiceResult<Value> {
            Ok(Value::Array(
                (0..count).map(|i| json!({"appId": i, "title": "x"})).collect(),
            ))
        }

        async fn reviews(
            &self,
            _app_id: &str,
            _count: u32,
            _locale: &Locale,
            _sort: &str,
        ) -> ServiceResult<Value> {
            Ok(json!([{"score": 5, "text": "great", "userName": "a"}]))
        }

        async fn developer(
            &self,
            _developer_id: &str,
            _count: u32,
            _locale: &Locale,
        ) -> ServiceResult<Value> {
            Ok(json!([]))
        }
    }

    fn locale() -> Locale {
        Locale::new("en", "us")
    }

    #[tokio::test]
    async fn test_app_fields_reuse_cached_analysis() {
        let service = ProjectingService::new(CountingAnalyzer::default());

        let full = service.app_analyze("com.chess", &locale(), None).await.unwrap();
        let fields = service
            .app_get_fields("com.chess", &["title".to_string()], &locale(), None)
            .await
            .unwrap();

        assert_eq!(full["score"], json!(4.5));
        assert_eq!(fields, json!({"title": "Chess"}));
        assert_eq!(service.analyzer().app_calls.load(Ordering::SeqCst), 1);
        assert_eq!(service.cached_apps(), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let service = ProjectingService::new(CountingAnalyzer::default());

        for _ in 0..2 {
            let err = service.app_analyze("missing", &locale(), None).await.unwrap_err();
            assert!(matches!(err, ServiceError::NotFound { .. }));
        }

        assert_eq!(service.analyzer().app_calls.load(Ordering::SeqCst), 2);
        assert_eq!(service.cached_apps(), 0);
    }

    #[tokio::test]
    async fn test_uncached_always_calls_backend() {
        let service = ProjectingService::with_cache(CountingAnalyzer::default(), false);

        service.app_analyze("com.chess", &locale(), None).await.unwrap();
        service.app_analyze("com.chess", &locale(), None).await.unwrap();

        assert_eq!(service.analyzer().app_calls.load(Ordering::SeqCst), 2);
        assert_eq!(service.cached_apps(), 0);
    }

    #[tokio::test]
    async fn test_list_fields_project_each_item() {
        let service = ProjectingService::new(CountingAnalyzer::default());

        let reviews = service
            .reviews_get_fields(
                "com.chess",
                &["score".to_string(), "text".to_string()],
                20,
                &locale(),
                "NEWEST",
            )
            .await
            .unwrap();
        assert_eq!(reviews, json!([{"score": 5, "text": "great"}]));

        let results = service
            .search_get_fields("chess", &["appId".to_string()], 2, &locale())
            .await
            .unwrap();
        assert_eq!(results, json!([{"appId": 0}, {"appId": 1}]));
    }
}
