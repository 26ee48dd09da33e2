//! Crash sub-counters read from keyed histograms.
//!
//! A keyed histogram maps a sub-category (`content`, `gpu`, ...) to a
//! histogram whose `values` hold bucket counts. The counter is the count of
//! one bucket, normally the first. Every lookup degrades to `0.0`: a missing
//! histogram, key, or bucket, or a malformed count, is never an error.

use serde_json::Value;

use crate::config::{CrashCounterSources, HistogramRef};

/// Count read from `histograms[name][key].values[bucket]`.
///
/// `values` may be an object keyed by bucket label or a plain array, in
/// which case the bucket label is used as an index.
pub fn bucket_count(histograms: Option<&Value>, source: &HistogramRef) -> f64 {
    let values = histograms
        .and_then(|h| h.get(&source.histogram))
        .and_then(|h| h.get(&source.key))
        .and_then(|h| h.get("values"));

    let count = match values {
        Some(Value::Object(buckets)) => buckets.get(&source.bucket),
        Some(Value::Array(buckets)) => source
            .bucket
            .parse::<usize>()
            .ok()
            .and_then(|index| buckets.get(index)),
        _ => None,
    };

    count
        .and_then(Value::as_f64)
        .filter(|c| c.is_finite() && *c > 0.0)
        .unwrap_or(0.0)
}

/// The five histogram-backed crash counters of one record.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SubprocessCrashes {
    pub content: f64,
    pub plugin: f64,
    pub gmplugin: f64,
    pub content_shutdown: f64,
    pub gpu: f64,
}

impl SubprocessCrashes {
    pub fn read(histograms: Option<&Value>, sources: &CrashCounterSources) -> Self {
        Self {
            content: bucket_count(histograms, &sources.content),
            plugin: bucket_count(histograms, &sources.plugin),
            gmplugin: bucket_count(histograms, &sources.gmplugin),
            content_shutdown: bucket_count(histograms, &sources.content_shutdown),
            gpu: bucket_count(histograms, &sources.gpu),
        }
    }
}
