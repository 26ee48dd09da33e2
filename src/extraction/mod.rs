//! Record classification and key extraction.
//!
//! Everything in this module is pure and per-record: no I/O, no shared
//! mutable state. [`Extractor`] is the entry point; the submodules hold the
//! individual lookup rules so they can be tested on their own.

pub mod dates;
pub mod dimensions;
pub mod extractor;
pub mod histograms;
pub mod json_path;

pub use extractor::{Classification, Extractor, RecordKind};
pub use json_path::{JsonLeaf, NestedTrees};
