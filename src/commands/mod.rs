//! CLI command implementations.
//!
//! Available commands:
//! - **aggregate**: Aggregate a range of daily windows into partitioned rows
//! - **dimensions**: List the configured dimensions and their source paths
//! - **init**: Write a default configuration file

pub mod aggregate;
pub mod dimensions;
pub mod init;

pub use aggregate::{
    handle_aggregate, process_window, processing_windows, AggregateConfig, WindowReport,
};
pub use dimensions::{describe_dimensions, handle_dimensions};
pub use init::{default_config_toml, init_config};
