//! GPlay Core - Foundation crate for the GPlay gateway.
//!
//! This crate provides the shared vocabulary every other gateway crate
//! depends on: the closed set of actions, the normalized field list,
//! central error types and TOML configuration.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared newtypes and enums (`Action`, `FieldList`)
//!
//! # Example
//!
//! ```rust
//! use gplay_core::{Action, AppConfig, FieldList};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert_eq!(config.defaults.language, "en");
//!
//! let action: Action = "Reviews".parse()?;
//! assert_eq!(action.required_param(), "appId");
//!
//! let fields = FieldList::parse(Some("score, text"));
//! assert_eq!(fields.as_slice(), ["score", "text"]);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, DefaultsConfig, ServerConfig, ServiceConfig};
pub use error::{ConfigError, ConfigResult, CoreError};
pub use types::{Action, FieldList};
