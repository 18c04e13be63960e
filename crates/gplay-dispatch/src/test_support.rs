//! Stub service shared by unit tests.

use crate::service::{Locale, PlayStoreService, ServiceError, ServiceResult};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Mutex;

/// Records every call it receives and answers with the call name.
///
/// `app_analyze("panic")` panics and `developer_analyze("gone")` reports
/// not found.
#[derive(Default)]
pub(crate) struct RecordingService {
    calls: Mutex<Vec<String>>,
}

impl RecordingService {
    pub(crate) fn record(&self, call: &str) -> ServiceResult<Value> {
        self.calls.lock().unwrap().push(call.to_string());
        Ok(json!({ "call": call }))
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlayStoreService for RecordingService {
    async fn app_analyze(
        &self,
        app_id: &str,
        _locale: &Locale,
        _assets: Option<&str>,
    ) -> ServiceResult<Value> {
        assert_ne!(app_id, "panic", "scraper blew up");
        self.record("app_analyze")
    }

    async fn app_get_fields(
        &self,
        _app_id: &str,
        _fields: &[String],
        _locale: &Locale,
        _assets: Option<&str>,
    ) -> ServiceResult<Value> {
        self.record("app_get_fields")
    }

    async fn search_analyze(
        &self,
        _query: &str,
        _count: u32,
        _locale: &Locale,
    ) -> ServiceResult<Value> {
        self.record("search_analyze")
    }

    async fn search_get_fields(
        &self,
        _query: &str,
        _fields: &[String],
        _count: u32,
        _locale: &Locale,
    ) -> ServiceResult<Value> {
        self.record("search_get_fields")
    }

    async fn reviews_analyze(
        &self,
        _app_id: &str,
        _count: u32,
        _locale: &Locale,
        _sort: &str,
    ) -> ServiceResult<Value> {
        self.record("reviews_analyze")
    }

    async fn reviews_get_fields(
        &self,
        _app_id: &str,
        _fields: &[String],
        _count: u32,
        _locale: &Locale,
        _sort: &str,
    ) -> ServiceResult<Value> {
        self.record("reviews_get_fields")
    }

    async fn developer_analyze(
        &self,
        developer_id: &str,
        _count: u32,
        _locale: &Locale,
    ) -> ServiceResult<Value> {
        if developer_id == "gone" {
            return Err(ServiceError::NotFound {
                resource: "developer 'gone'".to_string(),
            });
        }
        self.record("developer_analyze")
    }

    async fn developer_get_fields(
        &self,
        _developer_id: &str,
        _fields: &[String],
        _count: u32,
        _locale: &Locale,
    ) -> ServiceResult<Value> {
        self.record("developer_get_fields")
    }
}
