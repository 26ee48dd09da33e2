//! Field-name contract with the record source.
//!
//! Every name here is external: the defaults match the telemetry ping
//! layout, and a config file may override any of them.

use serde::{Deserialize, Serialize};

fn default_doc_type() -> String {
    "docType".into()
}

fn default_session_type() -> String {
    "main".into()
}

fn default_crash_type() -> String {
    "crash".into()
}

fn default_submission_date() -> String {
    "submissionDate".into()
}

fn default_usage_duration() -> String {
    "subsessionLength".into()
}

fn default_session_info() -> String {
    "payload.info".into()
}

fn default_session_start() -> String {
    "sessionStartDate".into()
}

fn default_crash_payload() -> String {
    "payload".into()
}

fn default_crash_date() -> String {
    "crashDate".into()
}

fn default_process_type() -> String {
    "processType".into()
}

fn default_primary_process() -> String {
    "main".into()
}

fn default_keyed_histograms() -> String {
    "payload.keyedHistograms".into()
}

/// Names of the fields the extractor reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNames {
    /// Type discriminator field.
    #[serde(default = "default_doc_type")]
    pub doc_type: String,

    /// Discriminator value of session records.
    #[serde(default = "default_session_type")]
    pub session_type: String,

    /// Discriminator value of crash records.
    #[serde(default = "default_crash_type")]
    pub crash_type: String,

    /// Compact `YYYYMMDD` submission date.
    #[serde(default = "default_submission_date")]
    pub submission_date: String,

    /// Session length in seconds. Only session records may carry it.
    #[serde(default = "default_usage_duration")]
    pub usage_duration: String,

    /// Nested document holding the session start date.
    #[serde(default = "default_session_info")]
    pub session_info: String,

    #[serde(default = "default_session_start")]
    pub session_start: String,

    /// Nested crash payload holding the crash date and process type.
    #[serde(default = "default_crash_payload")]
    pub crash_payload: String,

    #[serde(default = "default_crash_date")]
    pub crash_date: String,

    #[serde(default = "default_process_type")]
    pub process_type: String,

    /// Process type value of the primary process. Absent process types count as primary.
    #[serde(default = "default_primary_process")]
    pub primary_process: String,

    /// Nested document holding keyed histograms.
    #[serde(default = "default_keyed_histograms")]
    pub keyed_histograms: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            doc_type: default_doc_type(),
            session_type: default_session_type(),
            crash_type: default_crash_type(),
            submission_date: default_submission_date(),
            usage_duration: default_usage_duration(),
            session_info: default_session_info(),
            session_start: default_session_start(),
            crash_payload: default_crash_payload(),
            crash_date: default_crash_date(),
            process_type: default_process_type(),
            primary_process: default_primary_process(),
            keyed_histograms: default_keyed_histograms(),
        }
    }
}

/// Location of one crash sub-counter inside the keyed histograms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramRef {
    /// Histogram name, e.g. `SUBPROCESS_CRASHES_WITH_DUMP`.
    pub histogram: String,
    /// Sub-bucket key, e.g. `content`.
    pub key: String,
    /// Bucket whose count is read. Histograms keep counts under `values`.
    #[serde(default = "default_bucket")]
    pub bucket: String,
}

fn default_bucket() -> String {
    "0".into()
}

impl HistogramRef {
    pub fn new(histogram: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            histogram: histogram.into(),
            key: key.into(),
            bucket: default_bucket(),
        }
    }
}

const CRASHES_WITH_DUMP: &str = "SUBPROCESS_CRASHES_WITH_DUMP";
const KILL_HARD: &str = "SUBPROCESS_KILL_HARD";

fn default_content() -> HistogramRef {
    HistogramRef::new(CRASHES_WITH_DUMP, "content")
}

fn default_plugin() -> HistogramRef {
    HistogramRef::new(CRASHES_WITH_DUMP, "plugin")
}

fn default_gmplugin() -> HistogramRef {
    HistogramRef::new(CRASHES_WITH_DUMP, "gmplugin")
}

fn default_content_shutdown() -> HistogramRef {
    HistogramRef::new(KILL_HARD, "ShutDownKill")
}

fn default_gpu() -> HistogramRef {
    HistogramRef::new(CRASHES_WITH_DUMP, "gpu")
}

/// Histogram locations of the five crash sub-counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrashCounterSources {
    #[serde(default = "default_content")]
    pub content: HistogramRef,
    #[serde(default = "default_plugin")]
    pub plugin: HistogramRef,
    #[serde(default = "default_gmplugin")]
    pub gmplugin: HistogramRef,
    #[serde(default = "default_content_shutdown")]
    pub content_shutdown: HistogramRef,
    #[serde(default = "default_gpu")]
    pub gpu: HistogramRef,
}

impl Default for CrashCounterSources {
    fn default() -> Self {
        Self {
            content: default_content(),
            plugin: default_plugin(),
            gmplugin: default_gmplugin(),
            content_shutdown: default_content_shutdown(),
            gpu: default_gpu(),
        }
    }
}
