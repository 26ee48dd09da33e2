//! Error types for crash aggregation.
//!
//! Two layers exist and they never mix:
//!
//! - [`RejectReason`]: a per-record outcome. A rejected record is counted and
//!   skipped; it never aborts the run.
//! - [`Error`]: a run-level failure (unreadable input, unwritable output, bad
//!   configuration). These propagate to the driver unchanged.
//!
//! # Example
//!
//! ```rust
//! use crash_aggregates::errors::RejectReason;
//!
//! let reason = RejectReason::InvalidBuildId { found: Some("2023-01-01".into()) };
//! assert_eq!(reason.code(), "invalid_build_id");
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Why a single record produced no aggregation key.
///
/// Variants are mutually exclusive: the extractor stops at the first failing
/// step, so each record maps to exactly one reason.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum RejectReason {
    /// The type discriminator is absent or names neither a session nor a crash record.
    #[error("missing or unrecognized record type: {found:?}")]
    UnknownType { found: Option<String> },

    /// Crash record raised by a non-primary process.
    ///
    /// Those crashes are already reflected in the session record counters, so
    /// this is a deliberate drop rather than a malformed record.
    #[error("crash from secondary process {process_type:?}")]
    SecondaryCrash { process_type: String },

    /// Submission date missing or not a compact `YYYYMMDD` date.
    #[error("invalid submission date: {found:?}")]
    InvalidSubmissionDate { found: Option<String> },

    /// Session record without a numeric usage duration.
    #[error("session record has a missing or non-numeric usage duration")]
    InvalidUsageDuration,

    /// Crash record carrying a usage duration, which only session records may have.
    #[error("crash record unexpectedly carries a usage duration")]
    UnexpectedUsageDuration,

    /// Session start or crash timestamp missing or not an ISO date.
    #[error("missing or unparsable activity date")]
    InvalidActivityDate,

    /// Build id dimension is not exactly 14 decimal digits.
    #[error("invalid build id: {found:?}")]
    InvalidBuildId { found: Option<String> },
}

impl RejectReason {
    /// Stable identifier used as a diagnostics key.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnknownType { .. } => "unknown_type",
            Self::SecondaryCrash { .. } => "secondary_crash",
            Self::InvalidSubmissionDate { .. } => "invalid_submission_date",
            Self::InvalidUsageDuration => "invalid_usage_duration",
            Self::UnexpectedUsageDuration => "unexpected_usage_duration",
            Self::InvalidActivityDate => "invalid_activity_date",
            Self::InvalidBuildId { .. } => "invalid_build_id",
        }
    }
}

/// Run-level error for crash aggregation.
#[derive(Debug, Error)]
pub enum Error {
    /// File system errors with the offending path.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Processing window errors (bad date range, unparsable window)
    #[error("Invalid processing window: {0}")]
    InvalidWindow(String),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Result alias for run-level operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_codes_are_distinct() {
        let reasons = [
            RejectReason::UnknownType { found: None },
            RejectReason::SecondaryCrash {
                process_type: "content".into(),
            },
            RejectReason::InvalidSubmissionDate { found: None },
            RejectReason::InvalidUsageDuration,
            RejectReason::UnexpectedUsageDuration,
            RejectReason::InvalidActivityDate,
            RejectReason::InvalidBuildId { found: None },
        ];
        let codes: std::collections::HashSet<_> = reasons.iter().map(|r| r.code()).collect();
        assert_eq!(codes.len(), reasons.len());
    }

    #[test]
    fn test_io_error_display_includes_path() {
        let err = Error::io(
            "/data/20160301.jsonl",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let message = err.to_string();
        assert!(message.contains("/data/20160301.jsonl"));
        assert!(message.contains("denied"));
    }

    #[test]
    fn test_reject_reason_display() {
        let reason = RejectReason::InvalidSubmissionDate {
            found: Some("2016-03-01".into()),
        };
        assert_eq!(
            reason.to_string(),
            "invalid submission date: Some(\"2016-03-01\")"
        );
    }
}
