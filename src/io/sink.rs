//! Row sinks.

use chrono::NaiveDate;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::OutputRow;
use crate::errors::{Error, Result};

/// Receives the rendered rows of each processing window.
pub trait RowSink {
    fn write_window(&mut self, window: NaiveDate, rows: &[OutputRow]) -> Result<()>;
}

/// Writes rows as JSON lines to any writer, ignoring window boundaries.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RowSink for JsonLinesSink<W> {
    fn write_window(&mut self, _window: NaiveDate, rows: &[OutputRow]) -> Result<()> {
        write_rows(&mut self.writer, rows).map_err(|e| Error::io("<writer>", e))
    }
}

fn write_rows(writer: &mut impl Write, rows: &[OutputRow]) -> std::io::Result<()> {
    for row in rows {
        serde_json::to_writer(&mut *writer, row)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// One partition directory per window:
/// `<root>/submission_date=<YYYYMMDD>/part-00000.jsonl`.
///
/// Rewriting a window replaces its partition file.
#[derive(Debug, Clone)]
pub struct PartitionedDirSink {
    root: PathBuf,
}

impl PartitionedDirSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn partition_path(&self, window: NaiveDate) -> PathBuf {
        partition_path(&self.root, window)
    }
}

/// Partition file of a window under `root`.
pub fn partition_path(root: &Path, window: NaiveDate) -> PathBuf {
    root.join(format!("submission_date={}", window.format("%Y%m%d")))
        .join("part-00000.jsonl")
}

impl RowSink for PartitionedDirSink {
    fn write_window(&mut self, window: NaiveDate, rows: &[OutputRow]) -> Result<()> {
        let path = self.partition_path(window);
        let dir = path.parent().unwrap_or(self.root.as_path());
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

        write_staged(&path, |writer| write_rows(writer, rows))?;

        debug!(path = %path.display(), rows = rows.len(), "wrote partition");
        Ok(())
    }
}

/// Write beside `path`, then rename over it. The staging file is removed
/// if either step fails, so `path` is never left half-written.
fn write_staged(
    path: &Path,
    write: impl FnOnce(&mut BufWriter<fs::File>) -> std::io::Result<()>,
) -> Result<()> {
    let staging = path.with_extension("jsonl.tmp");
    let file = fs::File::create(&staging).map_err(|e| Error::io(&staging, e))?;
    let mut writer = BufWriter::new(file);

    let result = write(&mut writer)
        .and_then(|()| writer.flush())
        .map_err(|e| Error::io(&staging, e));
    drop(writer);

    let result =
        result.and_then(|()| fs::rename(&staging, path).map_err(|e| Error::io(path, e)));
    if result.is_err() {
        let _ = fs::remove_file(&staging);
    }
    result
}
