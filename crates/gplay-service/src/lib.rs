//! GPlay Service - the bundled Play Store service.
//!
//! Implements [`gplay_dispatch::PlayStoreService`] on top of any
//! [`Analyzer`] that can produce full analyses. Selective calls are
//! answered by projecting the requested fields out of the full result,
//! and full app analyses are cached per app, locale and asset size.
//!
//! The bundled [`FixtureCatalog`] analyzer reads JSON files from a local
//! directory so both front ends work without network access.
//!
//! # Example
//!
//! ```rust,no_run
//! use gplay_dispatch::{ActionRouter, Request};
//! use gplay_service::{FixtureCatalog, ProjectingService};
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let service = ProjectingService::new(FixtureCatalog::new("/srv/gplay/fixtures"));
//! let router = ActionRouter::new(Arc::new(service));
//!
//! let outcome = router
//!     .dispatch("app", &Request::from_pairs([("appId", "com.whatsapp"), ("fields", "title")]))
//!     .await;
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod analyzer;
pub mod cache;
pub mod error;
pub mod fixtures;
pub mod projection;
pub mod service;

// Re-export commonly used types
pub use analyzer::Analyzer;
pub use cache::{AppCache, AppKey};
pub use error::{CatalogError, Result};
pub use fixtures::{FixtureCatalog, ReviewSort, ASSET_SIZES};
pub use projection::project;
pub use service::ProjectingService;

use gplay_core::{AppConfig, ConfigResult};
use tracing::info;

/// Service backed by the fixture catalog.
pub type FixtureService = ProjectingService<FixtureCatalog>;

/// Build the fixture-backed service described by `config`.
pub fn fixture_service(config: &AppConfig) -> ConfigResult<FixtureService> {
    let dir = config.fixtures_dir()?;
    info!(
        dir = %dir.display(),
        cache_apps = config.service.cache_apps,
        "using fixture catalog"
    );
    Ok(ProjectingService::with_cache(
        FixtureCatalog::new(dir),
        config.service.cache_apps,
    ))
}
