use serde::{Deserialize, Serialize};

use super::dimensions::{DimensionSpec, BUILD_ID, GFX_COMPOSITOR};
use super::fields::{CrashCounterSources, FieldNames};
use super::parallel::ParallelConfig;
use crate::errors::{Error, Result};

fn default_build_id_dimension() -> String {
    BUILD_ID.into()
}

fn default_compositor_dimension() -> String {
    GFX_COMPOSITOR.into()
}

fn default_max_activity_lag_days() -> u32 {
    7
}

fn default_usage_hours_cap() -> f64 {
    25.0
}

/// Complete aggregation configuration, as read from `.crash-aggregates.toml`.
///
/// Every section is optional; an empty file yields [`AggregatorConfig::default`].
///
/// ```toml
/// max_activity_lag_days = 7
/// usage_hours_cap = 25.0
///
/// [fields]
/// doc_type = "docType"
///
/// [[dimensions]]
/// path = ["environment.build", "buildId"]
/// name = "build_id"
///
/// [parallel]
/// max_concurrency = 8
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatorConfig {
    #[serde(default)]
    pub fields: FieldNames,

    #[serde(default)]
    pub histograms: CrashCounterSources,

    #[serde(default)]
    pub dimensions: DimensionSpec,

    /// Dimension that must hold a 14-digit build id.
    #[serde(default = "default_build_id_dimension")]
    pub build_id_dimension: String,

    /// Dimension whose literal value `"none"` is treated as absent.
    #[serde(default = "default_compositor_dimension")]
    pub compositor_dimension: String,

    /// How many days before the submission date an activity date may fall.
    #[serde(default = "default_max_activity_lag_days")]
    pub max_activity_lag_days: u32,

    /// Upper bound of per-record usage hours.
    #[serde(default = "default_usage_hours_cap")]
    pub usage_hours_cap: f64,

    #[serde(default)]
    pub parallel: ParallelConfig,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            fields: FieldNames::default(),
            histograms: CrashCounterSources::default(),
            dimensions: DimensionSpec::default(),
            build_id_dimension: default_build_id_dimension(),
            compositor_dimension: default_compositor_dimension(),
            max_activity_lag_days: default_max_activity_lag_days(),
            usage_hours_cap: default_usage_hours_cap(),
            parallel: ParallelConfig::default(),
        }
    }
}

impl AggregatorConfig {
    /// Check cross-field constraints the type system cannot express.
    pub fn validate(&self) -> Result<()> {
        self.dimensions.validate()?;

        if self.dimensions.position(&self.build_id_dimension).is_none() {
            return Err(Error::config(format!(
                "build id dimension '{}' is not in the dimension list",
                self.build_id_dimension
            )));
        }

        if !(self.usage_hours_cap.is_finite() && self.usage_hours_cap > 0.0) {
            return Err(Error::config(format!(
                "usage_hours_cap must be a positive number, got {}",
                self.usage_hours_cap
            )));
        }

        if self.fields.session_type == self.fields.crash_type {
            return Err(Error::config(
                "session_type and crash_type must differ".to_string(),
            ));
        }

        Ok(())
    }
}
