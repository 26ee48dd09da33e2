// Shared record fixtures for integration tests
#![allow(dead_code)]

use crash_aggregates::RawRecord;
use serde_json::json;

pub const BUILD: &str =
    r#"{"version": "45.0", "buildId": "20160301030405", "architecture": "x86-64"}"#;

/// Main-type record submitted on 2016-03-05 with a session start on 2016-03-04.
pub fn session(duration_seconds: i64, country: &str) -> RawRecord {
    RawRecord::new()
        .with_field("docType", "main")
        .with_field("submissionDate", "20160305")
        .with_field("subsessionLength", duration_seconds)
        .with_field("payload.info", r#"{"sessionStartDate": "2016-03-04T00:00:00.0+01:00"}"#)
        .with_field("environment.build", BUILD)
        .with_field("geoCountry", country)
        .with_field("normalizedChannel", "release")
}

/// Crash-type record from the primary process.
pub fn crash(country: &str) -> RawRecord {
    RawRecord::new()
        .with_field("docType", "crash")
        .with_field("submissionDate", "20160305")
        .with_field(
            "payload",
            json!({"crashDate": "2016-03-04", "processType": "main"}).to_string(),
        )
        .with_field("environment.build", BUILD)
        .with_field("geoCountry", country)
        .with_field("normalizedChannel", "release")
}

/// Crash-type record from a content process.
pub fn secondary_crash(country: &str) -> RawRecord {
    crash(country).with_field(
        "payload",
        json!({"crashDate": "2016-03-04", "processType": "content"}).to_string(),
    )
}

/// Serialize records as newline-delimited JSON.
pub fn to_json_lines(records: &[RawRecord]) -> String {
    records
        .iter()
        .map(|record| serde_json::to_string(record).unwrap() + "\n")
        .collect()
}
