//! Record sources.

use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::RawRecord;
use crate::errors::{Error, Result};

/// Records of one processing window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowBatch {
    pub records: Vec<RawRecord>,
    /// Lines that were not a JSON object and were skipped.
    pub malformed_lines: usize,
}

/// Supplies the raw records of a processing window.
pub trait RecordSource {
    fn read_window(&self, window: NaiveDate) -> Result<WindowBatch>;
}

/// Reads `<root>/<YYYYMMDD>.jsonl`, one JSON object per line.
#[derive(Debug, Clone)]
pub struct JsonLinesSource {
    root: PathBuf,
}

impl JsonLinesSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn window_path(&self, window: NaiveDate) -> PathBuf {
        let file_name = format!("{}.jsonl", window.format("%Y%m%d"));
        self.root.join(file_name)
    }
}

impl RecordSource for JsonLinesSource {
    fn read_window(&self, window: NaiveDate) -> Result<WindowBatch> {
        let path = self.window_path(window);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "no input for window");
                return Ok(WindowBatch::default());
            }
            Err(e) => return Err(Error::io(&path, e)),
        };
        let batch = read_json_lines(BufReader::new(file), &path)?;
        debug!(
            path = %path.display(),
            records = batch.records.len(),
            malformed = batch.malformed_lines,
            "read window"
        );
        Ok(batch)
    }
}

/// Parse newline-delimited JSON records. Blank lines are ignored; lines that
/// are not JSON objects, including lines that are not valid UTF-8, are
/// counted and skipped. Only failures of the reader itself are errors.
pub fn read_json_lines(reader: impl BufRead, origin: &Path) -> Result<WindowBatch> {
    let mut batch = WindowBatch::default();
    for (index, line) in reader.split(b'\n').enumerate() {
        let line = line.map_err(|e| Error::io(origin, e))?;
        let line = line.strip_suffix(b"\r").unwrap_or(&line[..]);
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        let parsed = serde_json::from_slice::<serde_json::Value>(line)
            .ok()
            .and_then(|value| RawRecord::try_from(value).ok());
        match parsed {
            Some(record) => batch.records.push(record),
            None => {
                debug!(path = %origin.display(), line = index + 1, "skipping malformed record");
                batch.malformed_lines += 1;
            }
        }
    }
    Ok(batch)
}
