//! Dimension configuration.
//!
//! A dimension is a named categorical attribute used to slice aggregates.
//! Its extraction path is either a single top-level field, or a top-level
//! field holding a nested document followed by the keys to walk inside it.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::errors::{Error, Result};

/// Output name of the build id dimension in the default configuration.
pub const BUILD_ID: &str = "build_id";

/// Output name of the compositor dimension in the default configuration.
pub const GFX_COMPOSITOR: &str = "gfx_compositor";

/// One configured dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    /// Top-level field name, followed by nested keys for nested documents.
    pub path: Vec<String>,
    /// Output column name.
    pub name: String,
}

impl Dimension {
    pub fn new(path: &[&str], name: impl Into<String>) -> Self {
        Self {
            path: path.iter().map(|s| s.to_string()).collect(),
            name: name.into(),
        }
    }

    /// Top-level field the path starts at.
    pub fn field(&self) -> Option<&str> {
        self.path.first().map(String::as_str)
    }

    /// Keys walked inside the nested document. Empty for flat fields.
    pub fn nested_path(&self) -> &[String] {
        self.path.get(1..).unwrap_or_default()
    }

    pub fn is_nested(&self) -> bool {
        self.path.len() > 1
    }

    /// Path rendered for display, e.g. `environment.build / buildId`.
    pub fn display_path(&self) -> String {
        self.path.join(" / ")
    }
}

/// Ordered dimension list. Order determines slot positions in the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DimensionSpec {
    dimensions: Vec<Dimension>,
}

impl Default for DimensionSpec {
    fn default() -> Self {
        Self::new(default_dimensions())
    }
}

impl DimensionSpec {
    pub fn new(dimensions: Vec<Dimension>) -> Self {
        Self { dimensions }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dimension> {
        self.dimensions.iter()
    }

    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.dimensions.iter().map(|d| d.name.as_str())
    }

    /// Slot index of the dimension with the given output name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.dimensions.iter().position(|d| d.name == name)
    }

    /// Every path must name a field and output names must be unique.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for dimension in &self.dimensions {
            if dimension.path.is_empty() || dimension.path.iter().any(String::is_empty) {
                return Err(Error::config(format!(
                    "dimension '{}' has an empty extraction path",
                    dimension.name
                )));
            }
            if !seen.insert(dimension.name.as_str()) {
                return Err(Error::config(format!(
                    "duplicate dimension name '{}'",
                    dimension.name
                )));
            }
        }
        Ok(())
    }
}

/// The twelve dimensions of the standard crash aggregate.
pub fn default_dimensions() -> Vec<Dimension> {
    vec![
        Dimension::new(&["environment.build", "version"], "build_version"),
        Dimension::new(&["environment.build", "buildId"], BUILD_ID),
        Dimension::new(&["normalizedChannel"], "channel"),
        Dimension::new(&["appName"], "application"),
        Dimension::new(&["environment.system", "os", "name"], "os_name"),
        Dimension::new(&["environment.system", "os", "version"], "os_version"),
        Dimension::new(&["environment.build", "architecture"], "architecture"),
        Dimension::new(&["geoCountry"], "country"),
        Dimension::new(
            &["environment.addons", "activeExperiment", "id"],
            "experiment_id",
        ),
        Dimension::new(
            &["environment.addons", "activeExperiment", "branch"],
            "experiment_branch",
        ),
        Dimension::new(&["environment.settings", "e10sEnabled"], "e10s_enabled"),
        Dimension::new(
            &["environment.system", "gfx", "features", "compositor"],
            GFX_COMPOSITOR,
        ),
    ]
}
