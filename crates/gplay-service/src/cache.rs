//! In-memory cache of full app analyses.

use gplay_dispatch::Locale;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Everything a full app analysis depends on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppKey {
    /// Package name
    pub app_id: String,
    /// Language code
    pub language: String,
    /// Country code
    pub country: String,
    /// Asset size filter
    pub assets: Option<String>,
}

impl AppKey {
    /// Build a key for one analysis.
    #[must_use]
    pub fn new(app_id: &str, locale: &Locale, assets: Option<&str>) -> Self {
        Self {
            app_id: app_id.to_string(),
            language: locale.language.clone(),
            country: locale.country.clone(),
            assets: assets.map(str::to_string),
        }
    }
}

/// Shared cache of app analyses.
///
/// Only successful analyses are stored; failures are retried on the next
/// call. Entries live for the lifetime of the process.
#[derive(Debug, Default)]
pub struct AppCache {
    entries: RwLock<HashMap<AppKey, Value>>,
}

impl AppCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached analysis for a key.
    #[must_use]
    pub fn get(&self, key: &AppKey) -> Option<Value> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Store an analysis.
    pub fn insert(&self, key: AppKey, value: Value) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value);
    }

    /// Number of cached analyses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True when nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
