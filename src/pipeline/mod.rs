//! Classify, reduce, render.
//!
//! Records go through [`crate::extraction::Extractor::classify`], are
//! grouped and summed by [`reduce::aggregate_records`], and come out as
//! rows via [`render::render_rows`]. The reduction only relies on the
//! aggregate being a monoid, so a distributed substrate can run the same
//! fold per shard and combine the shards' results.

pub mod reduce;
pub mod render;

pub use reduce::{aggregate_records, Aggregate};
pub use render::{render_row, render_rows};
