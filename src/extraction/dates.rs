//! Submission and activity date parsing.

use chrono::{Days, NaiveDate};

/// Parse a compact `YYYYMMDD` date. Exactly eight ASCII digits, and a real calendar day.
pub fn parse_submission_date(raw: &str) -> Option<NaiveDate> {
    if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = raw[0..4].parse().ok()?;
    let month = raw[4..6].parse().ok()?;
    let day = raw[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse the leading ISO date (`YYYY-MM-DD`) of a timestamp such as
/// `2016-03-01T00:00:00.0+01:00`. Only the first ten characters are read.
pub fn parse_activity_date(raw: &str) -> Option<NaiveDate> {
    let prefix = raw.get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

/// Clamp `activity` into `[submission - max_lag_days, submission]`.
pub fn clamp_activity_date(
    activity: NaiveDate,
    submission: NaiveDate,
    max_lag_days: u32,
) -> NaiveDate {
    let earliest = submission
        .checked_sub_days(Days::new(u64::from(max_lag_days)))
        .unwrap_or(NaiveDate::MIN);
    activity.clamp(earliest, submission)
}
