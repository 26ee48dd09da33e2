use anyhow::{Context, Result};
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use crate::config::{AggregatorConfig, ParallelConfig};
use crate::errors::Error;
use crate::extraction::Extractor;
use crate::io::{JsonLinesSource, PartitionedDirSink, RecordSource, RowSink};
use crate::observability::Diagnostics;
use crate::pipeline::{aggregate_records, render_row};

const TEMPLATE_WINDOWS: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} windows {msg}";

pub struct AggregateConfig {
    /// Directory holding `<YYYYMMDD>.jsonl` input files.
    pub input: PathBuf,
    /// Root of the partitioned output.
    pub output: PathBuf,
    pub from: NaiveDate,
    /// Inclusive end of the window range.
    pub to: NaiveDate,
    pub settings: AggregatorConfig,
}

/// Outcome of one processing window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowReport {
    pub window: NaiveDate,
    pub rows: usize,
    pub malformed_lines: usize,
    pub diagnostics: Diagnostics,
}

/// Every day from `from` through `to`, inclusive.
pub fn processing_windows(from: NaiveDate, to: NaiveDate) -> crate::errors::Result<Vec<NaiveDate>> {
    if from > to {
        return Err(Error::InvalidWindow(format!(
            "start {} is after end {}",
            from.format("%Y%m%d"),
            to.format("%Y%m%d")
        )));
    }
    Ok(from.iter_days().take_while(|day| *day <= to).collect())
}

/// Read, aggregate, and write one window.
///
/// Rows are written sorted by activity date and dimensions so partition
/// files are reproducible; consumers must still not rely on row order.
pub fn process_window(
    extractor: &Extractor,
    source: &impl RecordSource,
    sink: &mut impl RowSink,
    window: NaiveDate,
    parallel: &ParallelConfig,
) -> crate::errors::Result<WindowReport> {
    let batch = source.read_window(window)?;
    let aggregate = aggregate_records(extractor, &batch.records, parallel);
    let (groups, diagnostics) = aggregate.into_parts();

    let mut groups: Vec<_> = groups.into_iter().collect();
    groups.sort_by(|(a, _), (b, _)| a.cmp(b));
    let rows: Vec<_> = groups
        .iter()
        .map(|(key, stats)| render_row(extractor.dimensions(), key, stats))
        .collect();

    sink.write_window(window, &rows)?;
    diagnostics.log_summary(&window.format("%Y%m%d").to_string());

    Ok(WindowReport {
        window,
        rows: rows.len(),
        malformed_lines: batch.malformed_lines,
        diagnostics,
    })
}

pub fn handle_aggregate(config: AggregateConfig) -> Result<Vec<WindowReport>> {
    let extractor = Extractor::new(&config.settings).context("Invalid aggregation config")?;
    let windows = processing_windows(config.from, config.to)?;
    let source = JsonLinesSource::new(&config.input);
    let mut sink = PartitionedDirSink::new(&config.output);

    info!(
        windows = windows.len(),
        input = %config.input.display(),
        output = %config.output.display(),
        "starting aggregation"
    );

    let progress = ProgressBar::new(windows.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template(TEMPLATE_WINDOWS)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let mut reports = Vec::with_capacity(windows.len());
    for window in windows {
        progress.set_message(window.format("%Y%m%d").to_string());
        let report = process_window(
            &extractor,
            &source,
            &mut sink,
            window,
            &config.settings.parallel,
        )
        .with_context(|| format!("Failed to process window {}", window.format("%Y%m%d")))?;
        reports.push(report);
        progress.inc(1);
    }
    progress.finish_and_clear();

    Ok(reports)
}
