//! Core data model: raw records, aggregation keys, statistics vectors, and
//! rendered rows.

pub mod key;
pub mod record;
pub mod row;
pub mod stats;

pub use key::AggregationKey;
pub use record::RawRecord;
pub use row::OutputRow;
pub use stats::{Observation, Stat, StatsVector, STAT_COUNT};
