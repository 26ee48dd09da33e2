use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifies one output row: the activity date plus one optional value per
/// configured dimension, in configuration order.
///
/// Equality and hashing are structural, so two records that agree on the
/// date and on every dimension slot (including which slots are `None`) land
/// in the same group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AggregationKey {
    activity_date: NaiveDate,
    dimensions: Vec<Option<String>>,
}

impl AggregationKey {
    pub fn new(activity_date: NaiveDate, dimensions: Vec<Option<String>>) -> Self {
        Self {
            activity_date,
            dimensions,
        }
    }

    pub fn activity_date(&self) -> NaiveDate {
        self.activity_date
    }

    /// Activity date as an ISO calendar date (`YYYY-MM-DD`).
    pub fn activity_date_iso(&self) -> String {
        self.activity_date.format("%Y-%m-%d").to_string()
    }

    pub fn dimensions(&self) -> &[Option<String>] {
        &self.dimensions
    }
}
