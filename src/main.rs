use anyhow::{Context, Result};
use clap::Parser;
use crash_aggregates::cli::{configure_thread_pool, init_logging, Cli, Commands};
use crash_aggregates::commands::{self, AggregateConfig};
use crash_aggregates::config::resolve_config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Aggregate {
            input,
            output,
            from,
            to,
            config,
            jobs,
            no_parallel,
            verbosity,
        } => {
            init_logging(verbosity);

            let mut settings =
                resolve_config(config.as_deref()).context("Failed to load configuration")?;
            settings.parallel = settings.parallel.with_overrides(jobs, no_parallel);
            configure_thread_pool(settings.parallel.effective_concurrency());

            let reports = commands::handle_aggregate(AggregateConfig {
                input,
                output,
                from,
                to: to.unwrap_or(from),
                settings,
            })?;

            for report in &reports {
                println!(
                    "{}  rows={} processed={} ignored={} malformed_lines={}",
                    report.window.format("%Y%m%d"),
                    report.rows,
                    report.diagnostics.processed(),
                    report.diagnostics.ignored(),
                    report.malformed_lines
                );
            }
            Ok(())
        }
        Commands::Dimensions { config } => {
            init_logging(0);
            let settings =
                resolve_config(config.as_deref()).context("Failed to load configuration")?;
            commands::handle_dimensions(&settings);
            Ok(())
        }
        Commands::Init { force } => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            commands::init_config(&cwd, force)
        }
    }
}
