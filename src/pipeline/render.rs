//! Rendering of reduced (key, statistics) pairs into output rows.

use std::collections::BTreeMap;

use super::reduce::Aggregate;
use crate::config::DimensionSpec;
use crate::core::{AggregationKey, OutputRow, StatsVector};

/// Render one key. Absent dimension values are left out of the row.
pub fn render_row(
    dimensions: &DimensionSpec,
    key: &AggregationKey,
    stats: &StatsVector,
) -> OutputRow {
    let dimensions = dimensions
        .names()
        .zip(key.dimensions())
        .filter_map(|(name, value)| value.as_ref().map(|v| (name.to_string(), v.clone())))
        .collect();

    let stats = stats
        .named()
        .map(|(name, value)| (name.to_string(), value))
        .collect::<BTreeMap<_, _>>();

    OutputRow {
        activity_date: key.activity_date_iso(),
        dimensions,
        stats,
    }
}

/// One row per distinct key. Row order is unspecified.
pub fn render_rows(dimensions: &DimensionSpec, aggregate: &Aggregate) -> Vec<OutputRow> {
    aggregate
        .groups()
        .iter()
        .map(|(key, stats)| render_row(dimensions, key, stats))
        .collect()
}
