//! Offline analysis backend reading JSON fixtures from disk.
//!
//! Layout:
//!
//! ```text
//! <root>/
//!   app/<appId>.json                  single object
//!   app/<appId>.<lang>_<country>.json localized variant, preferred
//!   search/<query>.json               list
//!   reviews/<appId>.json              list
//!   developer/<developerId>.json      list
//! ```
//!
//! Identifiers are turned into file stems by replacing every character
//! outside `[A-Za-z0-9._-]` with `_`, so `"Google LLC"` reads
//! `developer/Google_LLC.json`. An identifier whose file name would exceed
//! [`MAX_FILE_NAME`] bytes has no fixture and reports not found.
//!
//! Review `at` values are compared as strings, so fixtures must store them
//! as ISO-8601 UTC timestamps in one uniform format
//! (`2024-01-02T00:00:00Z`).

use crate::analyzer::Analyzer;
use crate::error::{CatalogError, Result};
use async_trait::async_trait;
use gplay_dispatch::{Locale, ServiceResult};
use serde_json::Value;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Longest fixture file name looked up, in bytes. Longer names are
/// rejected by common filesystems.
pub const MAX_FILE_NAME: usize = 255;

/// Asset sizes accepted for app lookups.
pub const ASSET_SIZES: [&str; 4] = ["SMALL", "MEDIUM", "LARGE", "ORIGINAL"];

/// Order in which reviews are returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewSort {
    /// Most recent first, by `at` (uniform ISO-8601 UTC strings)
    Newest,
    /// Highest score first, by `score`
    Rating,
    /// As stored
    Relevant,
}

impl ReviewSort {
    /// Parse a sort name, ignoring case.
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_ascii_uppercase().as_str() {
            "NEWEST" => Ok(Self::Newest),
            "RATING" => Ok(Self::Rating),
            "RELEVANT" => Ok(Self::Relevant),
            _ => Err(CatalogError::InvalidSort(name.to_string())),
        }
    }

    fn key(self) -> Option<&'static str> {
        match self {
            Self::Newest => Some("at"),
            Self::Rating => Some("score"),
            Self::Relevant => None,
        }
    }
}

/// Resource kinds, one subdirectory each.
#[derive(Debug, Clone, Copy)]
enum Kind {
    App,
    Search,
    Reviews,
    Developer,
}

impl Kind {
    fn dir(self) -> &'static str {
        match self {
            Self::App => "app",
            Self::Search => "search",
            Self::Reviews => "reviews",
            Self::Developer => "developer",
        }
    }
}

/// Analyzer backed by a directory of JSON fixtures.
#[derive(Debug, Clone)]
pub struct FixtureCatalog {
    root: PathBuf,
}

impl FixtureCatalog {
    /// Create a catalog rooted at `root`.
    ///
    /// A missing directory is not an error; every lookup will simply
    /// report not found.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        if !root.is_dir() {
            warn!(dir = %root.display(), "fixtures directory does not exist");
        }
        Self { root }
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Candidate paths for a resource, most specific first.
    fn candidates(&self, kind: Kind, id: &str, locale: &Locale) -> [PathBuf; 2] {
        let dir = self.root.join(kind.dir());
        let stem = file_stem(id);
        [
            dir.join(format!(
                "{stem}.{}_{}.json",
                file_stem(&locale.language),
                file_stem(&locale.country)
            )),
            dir.join(format!("{stem}.json")),
        ]
    }

    async fn load(&self, kind: Kind, id: &str, locale: &Locale) -> Result<Value> {
        for path in self.candidates(kind, id, locale) {
            if path.file_name().map_or(0, |name| name.len()) > MAX_FILE_NAME {
                debug!(kind = kind.dir(), path = %path.display(), "fixture name too long");
                continue;
            }

            let contents = match tokio::fs::read_to_string(&path).await {
                Ok(contents) => contents,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
                Err(err) => return Err(err.into()),
            };

            debug!(kind = kind.dir(), id, path = %path.display(), "loaded fixture");

            return serde_json::from_str(&contents).map_err(|err| CatalogError::Parse {
                path: path.display().to_string(),
                reason: err.to_string(),
            });
        }

        Err(CatalogError::NotFound {
            kind: kind.dir(),
            id: id.to_string(),
        })
    }

    async fn load_list(&self, kind: Kind, id: &str, locale: &Locale) -> Result<Vec<Value>> {
        match self.load(kind, id, locale).await? {
            Value::Array(items) => Ok(items),
            _ => Err(CatalogError::Parse {
                path: format!("{}/{}.json", kind.dir(), file_stem(id)),
                reason: "expected a JSON array".to_string(),
            }),
        }
    }

    /// Full details of one app.
    pub async fn read_app(
        &self,
        app_id: &str,
        locale: &Locale,
        assets: Option<&str>,
    ) -> Result<Value> {
        if let Some(assets) = assets {
            if !ASSET_SIZES.iter().any(|size| size.eq_ignore_ascii_case(assets)) {
                return Err(CatalogError::InvalidAssets(assets.to_string()));
            }
        }

        match self.load(Kind::App, app_id, locale).await? {
            app @ Value::Object(_) => Ok(app),
            _ => Err(CatalogError::Parse {
                path: format!("app/{}.json", file_stem(app_id)),
                reason: "expected a JSON object".to_string(),
            }),
        }
    }

    /// Up to `count` search results.
    pub async fn read_search(&self, query: &str, count: u32, locale: &Locale) -> Result<Value> {
        let results = self.load_list(Kind::Search, query, locale).await?;
        Ok(truncated(results, count))
    }

    /// Up to `count` reviews in `sort` order.
    pub async fn read_reviews(
        &self,
        app_id: &str,
        count: u32,
        locale: &Locale,
        sort: &str,
    ) -> Result<Value> {
        let sort = ReviewSort::parse(sort)?;
        let mut reviews = self.load_list(Kind::Reviews, app_id, locale).await?;
        if let Some(key) = sort.key() {
            // stable, so ties keep file order
            reviews.sort_by(|a, b| compare_values(&b[key], &a[key]));
        }
        Ok(truncated(reviews, count))
    }

    /// Up to `count` apps by one developer.
    pub async fn read_developer(
        &self,
        developer_id: &str,
        count: u32,
        locale: &Locale,
    ) -> Result<Value> {
        let apps = self.load_list(Kind::Developer, developer_id, locale).await?;
        Ok(truncated(apps, count))
    }
}

#[async_trait]
impl Analyzer for FixtureCatalog {
    async fn app(
        &self,
        app_id: &str,
        locale: &Locale,
        assets: Option<&str>,
    ) -> ServiceResult<Value> {
        Ok(self.read_app(app_id, locale, assets).await?)
    }

    async fn search(&self, query: &str, count: u32, locale: &Locale) -> ServiceResult<Value> {
        Ok(self.read_search(query, count, locale).await?)
    }

    async fn reviews(
        &self,
        app_id: &str,
        count: u32,
        locale: &Locale,
        sort: &str,
    ) -> ServiceResult<Value> {
        Ok(self.read_reviews(app_id, count, locale, sort).await?)
    }

    async fn developer(
        &self,
        developer_id: &str,
        count: u32,
        locale: &Locale,
    ) -> ServiceResult<Value> {
        Ok(self.read_developer(developer_id, count, locale).await?)
    }
}

/// Map an identifier onto a safe file stem.
fn file_stem(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn truncated(mut items: Vec<Value>, count: u32) -> Value {
    items.truncate(usize::try_from(count).unwrap_or(usize::MAX));
    Value::Array(items)
}

/// Order JSON scalars: numbers numerically, strings lexically, missing
/// values last when sorting descending.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => {
            let (a, b) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, value: &Value) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, serde_json::to_string(value).unwrap()).unwrap();
    }

    fn us() -> Locale {
        Locale::new("en", "us")
    }

    fn catalog() -> (TempDir, FixtureCatalog) {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "app/com.whatsapp.json", &json!({"title": "WhatsApp"}));
        write(
            dir.path(),
            "app/com.whatsapp.de_de.json",
            &json!({"title": "WhatsApp DE"}),
        );
        write(
            dir.path(),
            "reviews/com.whatsapp.json",
            &json!([
                {"id": "a", "score": 3, "at": "2024-01-02T00:00:00Z"},
                {"id": "b", "score": 5, "at": "2024-01-01T00:00:00Z"},
                {"id": "c", "score": 1, "at": "2024-01-03T00:00:00Z"}
            ]),
        );
        write(
            dir.path(),
            "developer/Google_LLC.json",
            &json!([{"appId": "1"}, {"appId": "2"}, {"appId": "3"}]),
        );
        let catalog = FixtureCatalog::new(dir.path());
        (dir, catalog)
    }

    fn ids(value: &Value) -> Vec<&str> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["id"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_localized_variant_preferred() {
        let (_dir, catalog) = catalog();

        let app = catalog
            .read_app("com.whatsapp", &Locale::new("de", "de"), None)
            .await
            .unwrap();
        assert_eq!(app["title"], "WhatsApp DE");

        let app = catalog.read_app("com.whatsapp", &us(), None).await.unwrap();
        assert_eq!(app["title"], "WhatsApp");
    }

    #[tokio::test]
    async fn test_review_sort_orders() {
        let (_dir, catalog) = catalog();

        let newest = catalog.read_reviews("com.whatsapp", 10, &us(), "NEWEST").await.unwrap();
        assert_eq!(ids(&newest), ["c", "a", "b"]);

        let rating = catalog.read_reviews("com.whatsapp", 10, &us(), "rating").await.unwrap();
        assert_eq!(ids(&rating), ["b", "a", "c"]);

        let relevant = catalog.read_reviews("com.whatsapp", 2, &us(), "RELEVANT").await.unwrap();
        assert_eq!(ids(&relevant), ["a", "b"]);

        let err = catalog.read_reviews("com.whatsapp", 10, &us(), "OLDEST").await.unwrap_err();
        assert!(matches!(err, CatalogError::InvalidSort(_)));
    }

    #[tokio::test]
    async fn test_identifier_mapping_and_truncation() {
        let (_dir, catalog) = catalog();

        let apps = catalog.read_developer("Google LLC", 2, &us()).await.unwrap();
        assert_eq!(apps, json!([{"appId": "1"}, {"appId": "2"}]));

        let apps = catalog.read_developer("Google LLC", 0, &us()).await.unwrap();
        assert_eq!(apps, json!([]));
    }

    #[tokio::test]
    async fn test_asset_validation() {
        let (_dir, catalog) = catalog();

        assert!(catalog.read_app("com.whatsapp", &us(), Some("large")).await.is_ok());
        let err = catalog.read_app("com.whatsapp", &us(), Some("HUGE")).await.unwrap_err();
        assert_eq!(err.to_string(), "unsupported asset size 'HUGE'");
    }

    #[tokio::test]
    async fn test_missing_and_malformed_fixtures() {
        let (dir, catalog) = catalog();
        fs::create_dir_all(dir.path().join("search")).unwrap();
        fs::write(dir.path().join("search/broken.json"), "{not json").unwrap();
        write(dir.path(), "search/object.json", &json!({"appId": "x"}));

        let err = catalog.read_search("nothing", 5, &us()).await.unwrap_err();
        assert_eq!(err.to_string(), "search 'nothing' not found");

        let err = catalog.read_search("broken", 5, &us()).await.unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));

        let err = catalog.read_search("object", 5, &us()).await.unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_overlong_identifier_is_not_found() {
        let (_dir, catalog) = catalog();
        let app_id = "a".repeat(300);

        let err = catalog.read_app(&app_id, &us(), None).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { kind: "app", .. }));

        let err = Analyzer::app(&catalog, &app_id, &us(), None).await.unwrap_err();
        assert!(err.is_domain());
        assert_eq!(err.to_string(), format!("app '{app_id}' not found"));

        let err = catalog.read_reviews(&"b".repeat(250), 5, &us(), "NEWEST").await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { kind: "reviews", .. }));
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("com.whatsapp"), "com.whatsapp");
        assert_eq!(file_stem("productivity apps"), "productivity_apps");
        assert_eq!(file_stem("../etc/passwd"), ".._etc_passwd");
    }
}
