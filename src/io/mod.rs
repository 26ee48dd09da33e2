//! Record sources and row sinks.
//!
//! These are the seams to the storage layer. The aggregation core only sees
//! `RawRecord`s going in and `OutputRow`s coming out; the local
//! implementations here read and write newline-delimited JSON.

pub mod sink;
pub mod source;

pub use sink::{partition_path, JsonLinesSink, PartitionedDirSink, RowSink};
pub use source::{read_json_lines, JsonLinesSource, RecordSource, WindowBatch};
