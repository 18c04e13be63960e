//! GPlay gateway application shell.
//!
//! Wires configuration, logging and the bundled service into the two
//! front ends: the HTTP API ([`server`]) and the interactive console
//! ([`console`]).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod console;
pub mod server;

use anyhow::{Context, Result};
use gplay_core::AppConfig;
use gplay_dispatch::{ActionRouter, ParamDefaults};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,gplay=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Load configuration from `path` (or the default location) plus the
/// environment.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = AppConfig::load_with_env(path).context("failed to load configuration")?;
    info!(
        language = %config.defaults.language,
        country = %config.defaults.country,
        "configuration loaded"
    );
    Ok(config)
}

/// Build the shared router over the fixture-backed service.
pub fn build_router(config: &AppConfig) -> Result<Arc<ActionRouter>> {
    let service = gplay_service::fixture_service(config).context("failed to build service")?;
    let defaults = ParamDefaults::from_config(&config.defaults);
    Ok(Arc::new(ActionRouter::with_defaults(
        Arc::new(service),
        &defaults,
    )))
}
