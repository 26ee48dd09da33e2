use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One rendered aggregate row.
///
/// `dimensions` omits every dimension whose value was absent for the key;
/// `stats` always carries all fifteen schema names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRow {
    pub activity_date: String,
    pub dimensions: BTreeMap<String, String>,
    pub stats: BTreeMap<String, f64>,
}

impl OutputRow {
    pub fn stat(&self, name: &str) -> Option<f64> {
        self.stats.get(name).copied()
    }

    pub fn dimension(&self, name: &str) -> Option<&str> {
        self.dimensions.get(name).map(String::as_str)
    }
}
