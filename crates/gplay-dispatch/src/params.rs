//! Parameter normalization.
//!
//! Callers hand the router loosely-typed string parameters. This module
//! turns them into typed, defaulted values without ever failing: bad
//! integers fall back to their default, blank strings fall back to theirs.
//! Presence of required identifiers is the handlers' concern.

use crate::service::Locale;
use gplay_core::DefaultsConfig;
use std::collections::HashMap;
use thiserror::Error;

/// Name of the action selector parameter.
pub const ACTION_PARAM: &str = "action";
/// Name of the field list parameter.
pub const FIELDS_PARAM: &str = "fields";

/// Immutable parameter map for one action invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    params: HashMap<String, String>,
}

impl Request {
    /// Build a request from name/value pairs. The first occurrence of a
    /// repeated name wins, as with query strings.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut params = HashMap::new();
        for (name, value) in pairs {
            params.entry(name.into()).or_insert_with(|| value.into());
        }
        Self { params }
    }

    /// Raw value of a parameter, if provided.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Value of a parameter that must be present and non-empty.
    pub fn required(&self, name: &'static str) -> Result<&str, ParamError> {
        self.get(name)
            .filter(|value| !value.is_empty())
            .ok_or(ParamError::Missing { name })
    }

    /// Typed value of an optional parameter, or its default.
    #[must_use]
    pub fn optional<T: ParamValue>(&self, param: &OptionalParam<T>) -> T {
        parse_or_default(self.get(param.name), &param.default)
    }

    /// A copy of this request without one parameter.
    #[must_use]
    pub fn without(&self, name: &str) -> Self {
        let mut params = self.params.clone();
        params.remove(name);
        Self { params }
    }

    /// Number of provided parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// True when no parameter was provided.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Request {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

/// Input problems detected before any service call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    /// A required identifier was absent or empty
    #[error("missing required parameter {name}")]
    Missing {
        /// Parameter name
        name: &'static str,
    },
}

/// A value type an optional parameter can be parsed into.
pub trait ParamValue: Clone {
    /// Parse a provided raw value. `None` means "use the default".
    fn from_raw(raw: &str) -> Option<Self>;
}

impl ParamValue for u32 {
    fn from_raw(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}

impl ParamValue for String {
    fn from_raw(raw: &str) -> Option<Self> {
        (!raw.is_empty()).then(|| raw.to_string())
    }
}

/// Nullable strings: an explicit empty value means "no value", which is
/// distinct from falling back to the default.
impl ParamValue for Option<String> {
    fn from_raw(raw: &str) -> Option<Self> {
        Some((!raw.is_empty()).then(|| raw.to_string()))
    }
}

/// Parse `raw` as `T`, substituting `default` when absent or unparseable.
pub fn parse_or_default<T: ParamValue>(raw: Option<&str>, default: &T) -> T {
    raw.and_then(T::from_raw)
        .unwrap_or_else(|| default.clone())
}

/// Declaration of one optional parameter: its name and default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionalParam<T> {
    /// Parameter name as it appears in a request
    pub name: &'static str,
    /// Value used when the parameter is absent or invalid
    pub default: T,
}

impl<T> OptionalParam<T> {
    /// Declare an optional parameter.
    pub fn new(name: &'static str, default: T) -> Self {
        Self { name, default }
    }
}

/// Language and country declarations shared by every action.
#[derive(Debug, Clone)]
pub struct LocaleParams {
    /// `lang` parameter
    pub language: OptionalParam<String>,
    /// `country` parameter
    pub country: OptionalParam<String>,
}

impl LocaleParams {
    /// Declarations with the given defaults.
    #[must_use]
    pub fn new(language: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            language: OptionalParam::new("lang", language.into()),
            country: OptionalParam::new("country", country.into()),
        }
    }

    /// Resolve the locale of a request.
    #[must_use]
    pub fn resolve(&self, request: &Request) -> Locale {
        Locale {
            language: request.optional(&self.language),
            country: request.optional(&self.country),
        }
    }
}

/// Per-action declarations of every optional parameter.
#[derive(Debug, Clone)]
pub struct ParamDefaults {
    /// Locale for every action
    pub locale: LocaleParams,
    /// `assets` for `app`
    pub app_assets: OptionalParam<Option<String>>,
    /// `count` for `search`
    pub search_count: OptionalParam<u32>,
    /// `count` for `reviews`
    pub reviews_count: OptionalParam<u32>,
    /// `sort` for `reviews`
    pub reviews_sort: OptionalParam<String>,
    /// `count` for `developer`
    pub developer_count: OptionalParam<u32>,
}

impl ParamDefaults {
    /// Build the declarations from configured defaults.
    #[must_use]
    pub fn from_config(config: &DefaultsConfig) -> Self {
        Self {
            locale: LocaleParams::new(config.language.clone(), config.country.clone()),
            app_assets: OptionalParam::new("assets", config.app_assets.clone()),
            search_count: OptionalParam::new("count", config.search_count),
            reviews_count: OptionalParam::new("count", config.reviews_count),
            reviews_sort: OptionalParam::new("sort", config.reviews_sort.clone()),
            developer_count: OptionalParam::new("count", config.developer_count),
        }
    }
}

impl Default for ParamDefaults {
    fn default() -> Self {
        Self::from_config(&DefaultsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(pairs: &[(&str, &str)]) -> Request {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_count_parsing() {
        let count = OptionalParam::new("count", 100_u32);
        assert_eq!(request(&[("count", "20")]).optional(&count), 20);
        assert_eq!(request(&[("count", " 5 ")]).optional(&count), 5);
        assert_eq!(request(&[("count", "abc")]).optional(&count), 100);
        assert_eq!(request(&[("count", "-3")]).optional(&count), 100);
        assert_eq!(request(&[("count", "")]).optional(&count), 100);
        assert_eq!(request(&[]).optional(&count), 100);
    }

    #[test]
    fn test_string_default_when_absent_or_empty() {
        let lang = OptionalParam::new("lang", "en".to_string());
        assert_eq!(request(&[("lang", "de")]).optional(&lang), "de");
        assert_eq!(request(&[("lang", "")]).optional(&lang), "en");
        assert_eq!(request(&[]).optional(&lang), "en");
    }

    #[test]
    fn test_assets_empty_means_no_filter() {
        let assets = OptionalParam::new("assets", Some("SMALL".to_string()));
        assert_eq!(
            request(&[("assets", "LARGE")]).optional(&assets).as_deref(),
            Some("LARGE")
        );
        assert_eq!(request(&[("assets", "")]).optional(&assets), None);
        assert_eq!(
            request(&[]).optional(&assets).as_deref(),
            Some("SMALL")
        );

        let unset = OptionalParam::new("assets", None::<String>);
        assert_eq!(request(&[]).optional(&unset), None);
        assert_eq!(request(&[("assets", "")]).optional(&unset), None);
    }

    #[test]
    fn test_required_param() {
        let req = request(&[("appId", "com.whatsapp"), ("query", "")]);
        assert_eq!(req.required("appId"), Ok("com.whatsapp"));
        assert_eq!(
            req.required("query"),
            Err(ParamError::Missing { name: "query" })
        );
        assert_eq!(
            req.required("developerId").unwrap_err().to_string(),
            "missing required parameter developerId"
        );
    }

    #[test]
    fn test_identifier_passed_verbatim() {
        let req = request(&[("query", "  Productivity Apps ")]);
        assert_eq!(req.required("query"), Ok("  Productivity Apps "));
    }

    #[test]
    fn test_locale_resolution() {
        let locale = LocaleParams::new("en", "us");
        let resolved = locale.resolve(&request(&[("country", "gb")]));
        assert_eq!(resolved, Locale::new("en", "gb"));
    }

    #[test]
    fn test_defaults_from_config_are_independent() {
        let config = DefaultsConfig {
            search_count: 11,
            reviews_count: 22,
            developer_count: 33,
            ..DefaultsConfig::default()
        };
        let defaults = ParamDefaults::from_config(&config);
        let empty = Request::default();
        assert_eq!(empty.optional(&defaults.search_count), 11);
        assert_eq!(empty.optional(&defaults.reviews_count), 22);
        assert_eq!(empty.optional(&defaults.developer_count), 33);
        assert_eq!(empty.optional(&defaults.reviews_sort), "NEWEST");
    }

    #[test]
    fn test_first_duplicate_wins() {
        let req = request(&[("count", "5"), ("count", "9")]);
        assert_eq!(req.get("count"), Some("5"));
        assert_eq!(req.len(), 1);
    }

    #[test]
    fn test_request_without() {
        let req = request(&[("action", "app"), ("appId", "x")]);
        let rest = req.without(ACTION_PARAM);
        assert_eq!(rest.get("action"), None);
        assert_eq!(rest.get("appId"), Some("x"));
        assert_eq!(rest.len(), 1);
        assert_eq!(req.len(), 2);
    }
}
