//! Record classification and aggregation key extraction.
//!
//! [`Extractor::extract`] is a single chain of fallible steps. Each step
//! either refines what is known about the record or stops with a
//! [`RejectReason`]:
//!
//! 1. record kind from the type field
//! 2. crash records only: drop secondary-process crashes
//! 3. submission date
//! 4. usage hours (required on sessions, forbidden on crashes)
//! 5. activity date, clamped relative to the submission date
//! 6. dimension values, then build id validation
//! 7. statistics vector
//!
//! The extractor holds only read-only configuration and is shared by
//! reference across worker threads.

use chrono::NaiveDate;
use serde_json::Value;
use tracing::trace;

use super::dates::{clamp_activity_date, parse_activity_date, parse_submission_date};
use super::dimensions::{extract_dimension, is_valid_build_id, leaf_to_dimension};
use super::histograms::SubprocessCrashes;
use super::json_path::NestedTrees;
use crate::config::{AggregatorConfig, CrashCounterSources, DimensionSpec, FieldNames};
use crate::core::{AggregationKey, Observation, RawRecord, StatsVector};
use crate::errors::{Error, RejectReason, Result};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// The two record streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Periodic usage report with a measured duration.
    Session,
    /// Exactly one abnormal termination.
    Crash,
}

/// Outcome of classifying one record.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Extracted {
        kind: RecordKind,
        key: AggregationKey,
        stats: StatsVector,
    },
    /// Crash from a non-primary process; not aggregated and not an error.
    SecondaryCrash,
    Rejected {
        /// `None` when the type itself could not be determined.
        kind: Option<RecordKind>,
        reason: RejectReason,
    },
}

/// Record-to-key transform built from an [`AggregatorConfig`].
#[derive(Debug, Clone)]
pub struct Extractor {
    fields: FieldNames,
    histograms: CrashCounterSources,
    dimensions: DimensionSpec,
    build_id_slot: usize,
    compositor_slot: Option<usize>,
    max_activity_lag_days: u32,
    usage_hours_cap: f64,
}

impl Extractor {
    /// Validate the configuration and resolve designated dimension slots.
    pub fn new(config: &AggregatorConfig) -> Result<Self> {
        config.validate()?;
        let build_id_slot = config
            .dimensions
            .position(&config.build_id_dimension)
            .ok_or_else(|| {
                Error::config(format!(
                    "unknown build id dimension '{}'",
                    config.build_id_dimension
                ))
            })?;

        Ok(Self {
            fields: config.fields.clone(),
            histograms: config.histograms.clone(),
            dimensions: config.dimensions.clone(),
            build_id_slot,
            compositor_slot: config.dimensions.position(&config.compositor_dimension),
            max_activity_lag_days: config.max_activity_lag_days,
            usage_hours_cap: config.usage_hours_cap,
        })
    }

    pub fn dimensions(&self) -> &DimensionSpec {
        &self.dimensions
    }

    /// Classify a record, keeping its kind for diagnostics even on rejection.
    pub fn classify(&self, record: &RawRecord) -> Classification {
        let kind = match self.record_kind(record) {
            Ok(kind) => kind,
            Err(reason) => {
                trace!(reason = reason.code(), "rejected record");
                return Classification::Rejected { kind: None, reason };
            }
        };

        match self.extract_kind(record, kind) {
            Ok((key, stats)) => Classification::Extracted { kind, key, stats },
            Err(RejectReason::SecondaryCrash { .. }) => Classification::SecondaryCrash,
            Err(reason) => {
                trace!(?kind, reason = reason.code(), "rejected record");
                Classification::Rejected {
                    kind: Some(kind),
                    reason,
                }
            }
        }
    }

    /// Key and statistics of a record, or why it cannot be aggregated.
    pub fn extract(
        &self,
        record: &RawRecord,
    ) -> Result<(AggregationKey, StatsVector), RejectReason> {
        let kind = self.record_kind(record)?;
        self.extract_kind(record, kind)
    }

    fn extract_kind(
        &self,
        record: &RawRecord,
        kind: RecordKind,
    ) -> Result<(AggregationKey, StatsVector), RejectReason> {
        let mut trees = NestedTrees::new(record);
        if kind == RecordKind::Crash {
            self.ensure_primary_process(&mut trees)?;
        }
        let submission = self.submission_date(record)?;
        let usage_hours = self.usage_hours(record, kind)?;
        let activity = self.activity_date(&mut trees, kind)?;
        let activity = clamp_activity_date(activity, submission, self.max_activity_lag_days);

        let dimensions = self.dimension_values(record, &mut trees);
        self.validate_build_id(&dimensions)?;

        let stats = self.stats(&mut trees, kind, usage_hours);
        Ok((AggregationKey::new(activity, dimensions), stats))
    }

    fn record_kind(&self, record: &RawRecord) -> Result<RecordKind, RejectReason> {
        match record.text(&self.fields.doc_type) {
            Some(t) if t == self.fields.session_type => Ok(RecordKind::Session),
            Some(t) if t == self.fields.crash_type => Ok(RecordKind::Crash),
            other => Err(RejectReason::UnknownType {
                found: other
                    .map(str::to_string)
                    .or_else(|| record.get(&self.fields.doc_type).map(Value::to_string)),
            }),
        }
    }

    /// An absent or unreadable process type counts as the primary process.
    fn ensure_primary_process(&self, trees: &mut NestedTrees<'_>) -> Result<(), RejectReason> {
        match trees.string(&self.fields.crash_payload, &[&self.fields.process_type]) {
            Some(process_type) if process_type != self.fields.primary_process => {
                Err(RejectReason::SecondaryCrash { process_type })
            }
            _ => Ok(()),
        }
    }

    fn submission_date(&self, record: &RawRecord) -> Result<NaiveDate, RejectReason> {
        let raw = record.get(&self.fields.submission_date);
        raw.and_then(Value::as_str)
            .and_then(parse_submission_date)
            .ok_or_else(|| RejectReason::InvalidSubmissionDate {
                found: raw.map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_string)),
            })
    }

    fn usage_hours(&self, record: &RawRecord, kind: RecordKind) -> Result<f64, RejectReason> {
        let duration = record.get(&self.fields.usage_duration);
        match (kind, duration) {
            (RecordKind::Crash, None) => Ok(0.0),
            (RecordKind::Crash, Some(_)) => Err(RejectReason::UnexpectedUsageDuration),
            (RecordKind::Session, duration) => {
                let seconds = duration
                    .and_then(numeric_value)
                    .ok_or(RejectReason::InvalidUsageDuration)?;
                Ok((seconds / SECONDS_PER_HOUR).clamp(0.0, self.usage_hours_cap))
            }
        }
    }

    fn activity_date(
        &self,
        trees: &mut NestedTrees<'_>,
        kind: RecordKind,
    ) -> Result<NaiveDate, RejectReason> {
        let raw = match kind {
            RecordKind::Session => {
                trees.string(&self.fields.session_info, &[&self.fields.session_start])
            }
            RecordKind::Crash => {
                trees.string(&self.fields.crash_payload, &[&self.fields.crash_date])
            }
        };
        raw.as_deref()
            .and_then(parse_activity_date)
            .ok_or(RejectReason::InvalidActivityDate)
    }

    fn dimension_values(
        &self,
        record: &RawRecord,
        trees: &mut NestedTrees<'_>,
    ) -> Vec<Option<String>> {
        self.dimensions
            .iter()
            .enumerate()
            .map(|(slot, dimension)| {
                let is_compositor = Some(slot) == self.compositor_slot;
                match dimension.field() {
                    Some(field) if dimension.is_nested() => leaf_to_dimension(
                        trees.leaf(field, dimension.nested_path()),
                        is_compositor,
                    ),
                    _ => extract_dimension(record, dimension, is_compositor),
                }
            })
            .collect()
    }

    fn validate_build_id(&self, dimensions: &[Option<String>]) -> Result<(), RejectReason> {
        let build_id = dimensions.get(self.build_id_slot).cloned().flatten();
        match build_id {
            Some(ref id) if is_valid_build_id(id) => Ok(()),
            found => Err(RejectReason::InvalidBuildId { found }),
        }
    }

    fn stats(
        &self,
        trees: &mut NestedTrees<'_>,
        kind: RecordKind,
        usage_hours: f64,
    ) -> StatsVector {
        let histograms = trees.get(&self.fields.keyed_histograms);
        let crashes = SubprocessCrashes::read(histograms, &self.histograms);

        StatsVector::from_observation(&Observation {
            usage_hours,
            main_crashes: match kind {
                RecordKind::Crash => 1.0,
                RecordKind::Session => 0.0,
            },
            content_crashes: crashes.content,
            plugin_crashes: crashes.plugin,
            gmplugin_crashes: crashes.gmplugin,
            content_shutdown_crashes: crashes.content_shutdown,
            gpu_crashes: crashes.gpu,
        })
    }
}

/// Finite number from a JSON number or a numeric string.
fn numeric_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Stat;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const BUILD: &str = r#"{"version": "45.0", "buildId": "20160301030405", "architecture": "x86-64"}"#;

    fn session(duration: impl Into<Value>) -> RawRecord {
        RawRecord::new()
            .with_field("docType", "main")
            .with_field("submissionDate", "20160305")
            .with_field("subsessionLength", duration)
            .with_field("payload.info", r#"{"sessionStartDate": "2016-03-04T00:00:00.0+01:00"}"#)
            .with_field("environment.build", BUILD)
    }

    fn crash(process_type: Option<&str>) -> RawRecord {
        let payload = match process_type {
            Some(p) => json!({"crashDate": "2016-03-04", "processType": p}),
            None => json!({"crashDate": "2016-03-04"}),
        };
        RawRecord::new()
            .with_field("docType", "crash")
            .with_field("submissionDate", "20160305")
            .with_field("payload", payload.to_string())
            .with_field("environment.build", BUILD)
    }

    fn extractor() -> Extractor {
        Extractor::new(&AggregatorConfig::default()).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_session_two_hours() {
        let (key, stats) = extractor().extract(&session(7200)).unwrap();

        assert_eq!(key.activity_date(), date(2016, 3, 4));
        assert_eq!(stats.get(Stat::PingCount), 1.0);
        assert_eq!(stats.get(Stat::UsageHours), 2.0);
        assert_eq!(stats.get(Stat::UsageHoursSquared), 4.0);
        assert_eq!(stats.get(Stat::MainCrashes), 0.0);
        assert_eq!(stats.get(Stat::MainCrashesSquared), 0.0);
    }

    #[test]
    fn test_session_usage_hours_cap() {
        let (_, stats) = extractor().extract(&session(500_000)).unwrap();
        assert_eq!(stats.get(Stat::UsageHours), 25.0);
        assert_eq!(stats.get(Stat::UsageHoursSquared), 625.0);
    }

    #[test]
    fn test_session_negative_duration_is_zero_hours() {
        let (_, stats) = extractor().extract(&session(-60)).unwrap();
        assert_eq!(stats.get(Stat::UsageHours), 0.0);
    }

    #[test]
    fn test_session_duration_as_string() {
        let (_, stats) = extractor().extract(&session("1800")).unwrap();
        assert_eq!(stats.get(Stat::UsageHours), 0.5);
    }

    #[test]
    fn test_session_without_numeric_duration_is_rejected() {
        let extractor = extractor();
        assert_eq!(
            extractor.extract(&session("long")),
            Err(RejectReason::InvalidUsageDuration)
        );
        assert_eq!(
            extractor.extract(&session("NaN")),
            Err(RejectReason::InvalidUsageDuration)
        );
        assert_eq!(
            extractor.extract(&session(Value::Null)),
            Err(RejectReason::InvalidUsageDuration)
        );
    }

    #[test]
    fn test_crash_with_duration_is_rejected() {
        let record = crash(Some("main")).with_field("subsessionLength", 10);
        assert_eq!(
            extractor().extract(&record),
            Err(RejectReason::UnexpectedUsageDuration)
        );
    }

    #[test]
    fn test_crash_counts_main_crash() {
        let (key, stats) = extractor().extract(&crash(Some("main"))).unwrap();
        assert_eq!(key.activity_date(), date(2016, 3, 4));
        assert_eq!(stats.get(Stat::MainCrashes), 1.0);
        assert_eq!(stats.get(Stat::MainCrashesSquared), 1.0);
        assert_eq!(stats.get(Stat::UsageHours), 0.0);
    }

    #[test]
    fn test_crash_without_process_type_is_main() {
        let classification = extractor().classify(&crash(None));
        assert!(matches!(
            classification,
            Classification::Extracted {
                kind: RecordKind::Crash,
                ..
            }
        ));
    }

    #[test]
    fn test_secondary_crash_is_dropped() {
        let extractor = extractor();
        assert_eq!(
            extractor.classify(&crash(Some("content"))),
            Classification::SecondaryCrash
        );
        assert_eq!(
            extractor.extract(&crash(Some("content"))),
            Err(RejectReason::SecondaryCrash {
                process_type: "content".into()
            })
        );
    }

    #[test]
    fn test_unknown_type() {
        let record = session(10).with_field("docType", "heartbeat");
        assert_eq!(
            extractor().classify(&record),
            Classification::Rejected {
                kind: None,
                reason: RejectReason::UnknownType {
                    found: Some("heartbeat".into())
                },
            }
        );

        let mut untyped = session(10);
        untyped.insert("docType", Value::Null);
        assert_eq!(
            extractor().extract(&untyped),
            Err(RejectReason::UnknownType { found: None })
        );
    }

    #[test]
    fn test_submission_date_validation() {
        let extractor = extractor();
        for bad in [json!("2016-03-05"), json!("2016035"), json!(20160305)] {
            let record = session(10).with_field("submissionDate", bad);
            assert!(matches!(
                extractor.extract(&record),
                Err(RejectReason::InvalidSubmissionDate { .. })
            ));
        }
    }

    #[test]
    fn test_activity_date_required() {
        let record = session(10).with_field("payload.info", "{}");
        assert_eq!(
            extractor().extract(&record),
            Err(RejectReason::InvalidActivityDate)
        );

        let record = crash(None).with_field("payload", r#"{"crashDate": "yesterday"}"#);
        assert_eq!(
            extractor().classify(&record),
            Classification::Rejected {
                kind: Some(RecordKind::Crash),
                reason: RejectReason::InvalidActivityDate,
            }
        );
    }

    #[test]
    fn test_activity_date_is_clamped() {
        let extractor = extractor();
        let early = session(10).with_field(
            "payload.info",
            r#"{"sessionStartDate": "2015-01-01T00:00:00"}"#,
        );
        let late = session(10).with_field(
            "payload.info",
            r#"{"sessionStartDate": "2016-04-01T00:00:00"}"#,
        );

        assert_eq!(
            extractor.extract(&early).unwrap().0.activity_date(),
            date(2016, 2, 27)
        );
        assert_eq!(
            extractor.extract(&late).unwrap().0.activity_date(),
            date(2016, 3, 5)
        );
    }

    #[test]
    fn test_build_id_validation() {
        let extractor = extractor();
        let bad = session(10).with_field("environment.build", r#"{"buildId": "2016-03-01"}"#);
        assert_eq!(
            extractor.extract(&bad),
            Err(RejectReason::InvalidBuildId {
                found: Some("2016-03-01".into())
            })
        );

        let missing = session(10).with_field("environment.build", "{}");
        assert_eq!(
            extractor.extract(&missing),
            Err(RejectReason::InvalidBuildId { found: None })
        );
    }

    #[test]
    fn test_dimension_values_in_configured_order() {
        let record = session(3600)
            .with_field("normalizedChannel", "release")
            .with_field("environment.settings", json!({"e10sEnabled": false}))
            .with_field(
                "environment.system",
                r#"{"os": {"name": "Linux", "version": 4}, "gfx": {"features": {"compositor": "none"}}}"#,
            );

        let (key, _) = extractor().extract(&record).unwrap();
        assert_eq!(
            key.dimensions(),
            &[
                Some("45.0".to_string()),
                Some("20160301030405".to_string()),
                Some("release".to_string()),
                None,
                Some("Linux".to_string()),
                Some("4".to_string()),
                Some("x86-64".to_string()),
                None,
                None,
                None,
                Some("False".to_string()),
                None,
            ]
        );
    }

    #[test]
    fn test_histogram_counters() {
        let record = session(3600).with_field(
            "payload.keyedHistograms",
            json!({
                "SUBPROCESS_CRASHES_WITH_DUMP": {
                    "content": {"values": {"0": 2}},
                    "gpu": {"values": {"0": 1}}
                },
                "SUBPROCESS_KILL_HARD": {"ShutDownKill": {"values": {"0": 3}}}
            })
            .to_string(),
        );

        let (_, stats) = extractor().extract(&record).unwrap();
        assert_eq!(stats.get(Stat::ContentCrashes), 2.0);
        assert_eq!(stats.get(Stat::ContentCrashesSquared), 4.0);
        assert_eq!(stats.get(Stat::GpuCrashes), 1.0);
        assert_eq!(stats.get(Stat::ContentShutdownCrashes), 3.0);
        assert_eq!(stats.get(Stat::ContentShutdownCrashesSquared), 9.0);
        assert_eq!(stats.get(Stat::PluginCrashes), 0.0);
    }

    #[test]
    fn test_malformed_histograms_degrade_to_zero() {
        let record = session(3600).with_field("payload.keyedHistograms", "{broken");
        let (_, stats) = extractor().extract(&record).unwrap();
        assert_eq!(stats.get(Stat::ContentCrashes), 0.0);
        assert!(stats.values().iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn test_new_rejects_config_without_build_id_dimension() {
        let config = AggregatorConfig {
            build_id_dimension: "does_not_exist".into(),
            ..Default::default()
        };
        assert!(Extractor::new(&config).is_err());
    }

    #[test]
    fn test_dimensions_sharing_an_encoded_field() {
        let record = session(3600).with_field(
            "environment.system",
            json!({
                "os": {"name": "Linux", "version": "4.4"},
                "gfx": {"features": {"compositor": "none"}}
            })
            .to_string(),
        );

        let extractor = extractor();
        let (key, _) = extractor.extract(&record).unwrap();
        let value = |name: &str| {
            let slot = extractor.dimensions().position(name).unwrap();
            key.dimensions()[slot].clone()
        };

        assert_eq!(value("os_name"), Some("Linux".to_string()));
        assert_eq!(value("os_version"), Some("4.4".to_string()));
        assert_eq!(value("gfx_compositor"), None);
        assert_eq!(value("build_version"), Some("45.0".to_string()));
        assert_eq!(value("architecture"), Some("x86-64".to_string()));
    }
}
