use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::extraction::dates::parse_submission_date;

#[derive(Parser, Debug)]
#[command(name = "crash-aggregates")]
#[command(about = "Daily crash and usage aggregates from telemetry records", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Aggregate one or more daily submission windows
    Aggregate {
        /// Directory of `<YYYYMMDD>.jsonl` input files
        #[arg(short, long)]
        input: PathBuf,

        /// Root directory for partitioned output
        #[arg(short, long)]
        output: PathBuf,

        /// First submission window (YYYYMMDD)
        #[arg(long, value_parser = parse_window_date)]
        from: NaiveDate,

        /// Last submission window, inclusive (YYYYMMDD, defaults to --from)
        #[arg(long, value_parser = parse_window_date)]
        to: Option<NaiveDate>,

        /// Configuration file (defaults to discovering .crash-aggregates.toml)
        #[arg(short, long, env = "CRASH_AGGREGATES_CONFIG")]
        config: Option<PathBuf>,

        /// Number of worker threads (0 = all cores)
        #[arg(short = 'j', long = "jobs", default_value = "0")]
        jobs: usize,

        /// Process records sequentially
        #[arg(long = "no-parallel")]
        no_parallel: bool,

        /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// List the configured dimensions
    Dimensions {
        /// Configuration file (defaults to discovering .crash-aggregates.toml)
        #[arg(short, long, env = "CRASH_AGGREGATES_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Write a default .crash-aggregates.toml into the current directory
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

/// Window dates use the same `YYYYMMDD` form as submission dates.
pub fn parse_window_date(raw: &str) -> Result<NaiveDate, String> {
    parse_submission_date(raw).ok_or_else(|| format!("expected a YYYYMMDD date, got '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aggregate_args() {
        let cli = Cli::try_parse_from([
            "crash-aggregates",
            "aggregate",
            "--input",
            "in",
            "--output",
            "out",
            "--from",
            "20160301",
            "-j",
            "2",
            "-vv",
        ])
        .unwrap();

        match cli.command {
            Commands::Aggregate {
                from,
                to,
                jobs,
                verbosity,
                no_parallel,
                ..
            } => {
                assert_eq!(from, NaiveDate::from_ymd_opt(2016, 3, 1).unwrap());
                assert_eq!(to, None);
                assert_eq!(jobs, 2);
                assert_eq!(verbosity, 2);
                assert!(!no_parallel);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_rejects_iso_window_date() {
        let result = Cli::try_parse_from([
            "crash-aggregates",
            "aggregate",
            "--input",
            "in",
            "--output",
            "out",
            "--from",
            "2016-03-01",
        ]);
        assert!(result.is_err());
    }
}
