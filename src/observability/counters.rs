//! Per-partition diagnostic counters.
//!
//! Every worker keeps its own [`Diagnostics`] and the partials are combined
//! once at the end, so counting needs no shared mutable state. Combination
//! is field-wise addition: associative, commutative, with the all-zero
//! value as identity.

use serde::Serialize;
use std::collections::BTreeMap;
use stillwater::{Monoid, Semigroup};
use tracing::{info, warn};

use crate::extraction::{Classification, RecordKind};

/// Processed and ignored record counts for one run or partition.
///
/// Each classified record increments exactly one of the six counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    pub session_processed: u64,
    pub session_ignored: u64,
    pub crash_processed: u64,
    pub crash_ignored: u64,
    pub secondary_crash_ignored: u64,
    /// Records whose type field was missing or unrecognized.
    pub unknown_type_ignored: u64,
    /// Rejections broken down by [`crate::errors::RejectReason::code`].
    pub rejections: BTreeMap<&'static str, u64>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one classification outcome.
    pub fn observe(&mut self, classification: &Classification) {
        match classification {
            Classification::Extracted {
                kind: RecordKind::Session,
                ..
            } => self.session_processed += 1,
            Classification::Extracted {
                kind: RecordKind::Crash,
                ..
            } => self.crash_processed += 1,
            Classification::SecondaryCrash => self.secondary_crash_ignored += 1,
            Classification::Rejected { kind, reason } => {
                match kind {
                    Some(RecordKind::Session) => self.session_ignored += 1,
                    Some(RecordKind::Crash) => self.crash_ignored += 1,
                    None => self.unknown_type_ignored += 1,
                }
                *self.rejections.entry(reason.code()).or_insert(0) += 1;
            }
        }
    }

    pub fn processed(&self) -> u64 {
        self.session_processed + self.crash_processed
    }

    pub fn ignored(&self) -> u64 {
        self.session_ignored
            + self.crash_ignored
            + self.secondary_crash_ignored
            + self.unknown_type_ignored
    }

    /// Every record seen, aggregated or not.
    pub fn total(&self) -> u64 {
        self.processed() + self.ignored()
    }

    /// Emit the counters as one structured log event.
    pub fn log_summary(&self, window: &str) {
        info!(
            window,
            session_processed = self.session_processed,
            session_ignored = self.session_ignored,
            crash_processed = self.crash_processed,
            crash_ignored = self.crash_ignored,
            secondary_crash_ignored = self.secondary_crash_ignored,
            unknown_type_ignored = self.unknown_type_ignored,
            "window classified"
        );
        for (code, count) in &self.rejections {
            warn!(window, reason = *code, count = *count, "records rejected");
        }
    }
}

impl Semigroup for Diagnostics {
    fn combine(mut self, other: Self) -> Self {
        self.session_processed += other.session_processed;
        self.session_ignored += other.session_ignored;
        self.crash_processed += other.crash_processed;
        self.crash_ignored += other.crash_ignored;
        self.secondary_crash_ignored += other.secondary_crash_ignored;
        self.unknown_type_ignored += other.unknown_type_ignored;
        for (code, count) in other.rejections {
            *self.rejections.entry(code).or_insert(0) += count;
        }
        self
    }
}

impl Monoid for Diagnostics {
    fn empty() -> Self {
        Self::default()
    }
}
