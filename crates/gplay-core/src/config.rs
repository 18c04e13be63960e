//! Configuration management for the GPlay gateway.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Main application configuration.
///
/// This is loaded from `~/.config/gplay/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Per-action parameter defaults
    pub defaults: DefaultsConfig,
    /// HTTP transport settings
    pub server: ServerConfig,
    /// Bundled service settings
    pub service: ServiceConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file. The file must exist.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        tracing::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Reads `path` when given, otherwise the XDG location. Supports the
    /// following environment variables:
    /// - `GPLAY_LANGUAGE`: Override the default language
    /// - `GPLAY_COUNTRY`: Override the default country
    /// - `GPLAY_BIND`: Override the HTTP bind address
    /// - `GPLAY_FIXTURES_DIR`: Override the fixture directory
    pub fn load_with_env(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in
    /// production). Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(language) = value("GPLAY_LANGUAGE") {
            tracing::debug!("Override defaults.language from env: {}", language);
            self.defaults.language = language;
        }

        if let Some(country) = value("GPLAY_COUNTRY") {
            tracing::debug!("Override defaults.country from env: {}", country);
            self.defaults.country = country;
        }

        if let Some(bind) = value("GPLAY_BIND") {
            tracing::debug!("Override server.bind from env: {}", bind);
            self.server.bind = bind;
        }

        if let Some(dir) = value("GPLAY_FIXTURES_DIR") {
            tracing::debug!("Override service.fixtures_dir from env: {}", dir);
            self.service.fixtures_dir = Some(PathBuf::from(dir));
        }
    }

    /// Check values the rest of the gateway relies on.
    pub fn validate(&self) -> ConfigResult<()> {
        for (field, value) in [
            ("defaults.language", &self.defaults.language),
            ("defaults.country", &self.defaults.country),
            ("defaults.reviews_sort", &self.defaults.reviews_sort),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        }

        if self.server.bind.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::InvalidValue {
                field: "server.bind".to_string(),
                reason: format!("'{}' is not a socket address", self.server.bind),
            });
        }

        Ok(())
    }

    /// Resolve the fixture directory: the configured one, or
    /// `<data_dir>/fixtures`.
    pub fn fixtures_dir(&self) -> ConfigResult<PathBuf> {
        match &self.service.fixtures_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::data_dir()?.join("fixtures")),
        }
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/gplay/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("com", "gplay", "gplay").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Get the data directory path.
    ///
    /// Uses XDG base directories: `~/.local/share/gplay`
    pub fn data_dir() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("com", "gplay", "gplay").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.data_dir().to_path_buf())
    }
}

/// Defaults substituted for optional parameters a caller leaves out.
///
/// Each action's result count is configured independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Two-letter language code
    pub language: String,
    /// Two-letter country code
    pub country: String,
    /// Result count for `search`
    pub search_count: u32,
    /// Result count for `reviews`
    pub reviews_count: u32,
    /// Result count for `developer`
    pub developer_count: u32,
    /// Review sort order: `NEWEST`, `RELEVANT` or `RATING`
    pub reviews_sort: String,
    /// Asset size filter for `app` (unset = no filter)
    pub app_assets: Option<String>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            country: "us".to_string(),
            search_count: 100,
            reviews_count: 20,
            developer_count: 50,
            reviews_sort: "NEWEST".to_string(),
            app_assets: None,
        }
    }
}

/// HTTP transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Bundled service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Directory holding JSON fixtures (unset = `<data_dir>/fixtures`)
    pub fixtures_dir: Option<PathBuf>,
    /// Cache full app analyses between selective calls
    pub cache_apps: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            fixtures_dir: None,
            cache_apps: true,
        }
    }
}
