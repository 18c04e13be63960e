//! Shared types used across the GPlay gateway.
//!
//! This module defines the closed action set and the normalized field
//! list that every front end and the router agree on.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four resources the gateway exposes.
///
/// The set is closed: anything else is rejected before any parameter
/// normalization happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Details for a single app
    App,
    /// Search results for a query
    Search,
    /// Reviews for a single app
    Reviews,
    /// Apps published by a developer
    Developer,
}

impl Action {
    /// Every supported action, in display order.
    pub const ALL: [Action; 4] = [
        Action::App,
        Action::Search,
        Action::Reviews,
        Action::Developer,
    ];

    /// Canonical lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::App => "app",
            Self::Search => "search",
            Self::Reviews => "reviews",
            Self::Developer => "developer",
        }
    }

    /// Name of the identifying parameter this action cannot run without.
    #[must_use]
    pub fn required_param(self) -> &'static str {
        match self {
            Self::App | Self::Reviews => "appId",
            Self::Search => "query",
            Self::Developer => "developerId",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = CoreError;

    /// Case-insensitive lookup: `"APP"` and `"app"` name the same action.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::UnsupportedAction {
                name: s.to_string(),
            })
    }
}

/// Ordered set of requested field names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldList(Vec<String>);

impl FieldList {
    /// Parse a raw comma-separated value. Absent input yields an empty list.
    ///
    /// Segments are trimmed, blanks dropped, and a repeated name keeps only
    /// its first position.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let mut fields: Vec<String> = Vec::new();
        for segment in raw.unwrap_or_default().split(',').map(str::trim) {
            if !segment.is_empty() && !fields.iter().any(|field| field == segment) {
                fields.push(segment.to_string());
            }
        }
        Self(fields)
    }

    /// True when no field was requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of requested fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Borrow the field names.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Iterate over the field names.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a FieldList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
