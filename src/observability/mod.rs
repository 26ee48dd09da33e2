//! Run diagnostics.
//!
//! Counters are diagnostics only: they never influence which rows are
//! produced. They are accumulated per partition and folded into a total
//! with the rest of the aggregate.
//!
//! ```ignore
//! use crash_aggregates::observability::Diagnostics;
//!
//! let mut local = Diagnostics::new();
//! local.observe(&extractor.classify(&record));
//! local.log_summary("20160301");
//! ```

pub mod counters;

pub use counters::Diagnostics;
