// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod extraction;
pub mod io;
pub mod observability;
pub mod pipeline;

// Re-export commonly used types
pub use crate::core::{
    AggregationKey, Observation, OutputRow, RawRecord, Stat, StatsVector, STAT_COUNT,
};

pub use crate::config::{AggregatorConfig, Dimension, DimensionSpec, ParallelConfig};

pub use crate::errors::{Error, RejectReason, Result};

pub use crate::extraction::{Classification, Extractor, RecordKind};

pub use crate::io::{JsonLinesSink, JsonLinesSource, PartitionedDirSink, RecordSource, RowSink};

pub use crate::observability::Diagnostics;

pub use crate::pipeline::{aggregate_records, render_row, render_rows, Aggregate};
