//! Command-line interface.
//!
//! - Argument parsing (`args`)
//! - Runtime setup (`setup`)

pub mod args;
pub mod setup;

pub use args::{parse_window_date, Cli, Commands};
pub use setup::{configure_thread_pool, init_logging, verbosity_directive};
