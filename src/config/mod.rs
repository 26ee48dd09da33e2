// Sub-modules
mod core;
pub mod dimensions;
pub mod fields;
mod loader;
mod parallel;

// Re-export core types
pub use self::core::AggregatorConfig;
pub use dimensions::{default_dimensions, Dimension, DimensionSpec};
pub use fields::{CrashCounterSources, FieldNames, HistogramRef};
pub use loader::{
    directory_ancestors, load_config, load_config_from, parse_and_validate_config,
    resolve_config, CONFIG_FILE_NAME,
};
pub use parallel::ParallelConfig;
