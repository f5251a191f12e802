//! Time utilities: statement wall-clock timestamps to UTC instants.
//!
//! Monobank exports operation times as `DD.MM.YYYY HH:MM:SS` without an
//! offset. The wall-clock value is interpreted in a [`StatementZone`] and
//! re-emitted as an ISO-8601 UTC instant with millisecond precision.

use chrono::{DateTime, Local, LocalResult, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

static STATEMENT_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2})\.(\d{2})\.(\d{4}) (\d{2}):(\d{2}):(\d{2})$")
        .expect("statement timestamp pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateFormatError {
    #[error("timestamp '{0}' does not match DD.MM.YYYY HH:MM:SS")]
    Pattern(String),

    #[error("timestamp '{0}' is not a valid calendar date and time")]
    OutOfRange(String),

    #[error("timestamp '{value}' does not exist in timezone {zone} (DST gap)")]
    Nonexistent { value: String, zone: String },
}

/// Timezone used to interpret statement wall-clock times.
///
/// `Local` follows the executing process (the `TZ` environment variable on
/// unix). Tests and deployments that need deterministic output should name
/// an IANA zone instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StatementZone {
    #[default]
    Local,
    Named(Tz),
}

impl StatementZone {
    /// Resolve a naive wall-clock time to a UTC instant.
    ///
    /// Ambiguous times (DST fold) resolve to the earlier instant; times in a
    /// DST gap have no instant and return `None`.
    pub fn to_utc(&self, local: &NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            StatementZone::Local => earliest(Local.from_local_datetime(local)),
            StatementZone::Named(tz) => earliest(tz.from_local_datetime(local)),
        }
    }
}

fn earliest<T: TimeZone>(resolved: LocalResult<DateTime<T>>) -> Option<DateTime<Utc>> {
    resolved.earliest().map(|dt| dt.with_timezone(&Utc))
}

impl FromStr for StatementZone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("local") {
            return Ok(StatementZone::Local);
        }
        s.parse::<Tz>()
            .map(StatementZone::Named)
            .map_err(|_| format!("invalid timezone: {s}"))
    }
}

impl TryFrom<String> for StatementZone {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StatementZone> for String {
    fn from(zone: StatementZone) -> Self {
        zone.to_string()
    }
}

impl fmt::Display for StatementZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementZone::Local => f.write_str("local"),
            StatementZone::Named(tz) => f.write_str(tz.name()),
        }
    }
}

/// Parse `DD.MM.YYYY HH:MM:SS` into a naive date-time.
pub fn parse_statement_datetime(raw: &str) -> Result<NaiveDateTime, DateFormatError> {
    let value = raw.trim();
    let caps = STATEMENT_TIMESTAMP
        .captures(value)
        .ok_or_else(|| DateFormatError::Pattern(value.to_string()))?;

    // Every group is 2-4 ASCII digits, so the parses cannot overflow.
    let field = |i: usize| caps[i].parse::<u32>().unwrap_or(u32::MAX);
    let year = caps[3].parse::<i32>().unwrap_or(i32::MAX);

    NaiveDate::from_ymd_opt(year, field(2), field(1))
        .and_then(|date| date.and_hms_opt(field(4), field(5), field(6)))
        .ok_or_else(|| DateFormatError::OutOfRange(value.to_string()))
}

/// Parse a statement timestamp and resolve it in `zone`.
pub fn parse_statement_timestamp(
    raw: &str,
    zone: &StatementZone,
) -> Result<DateTime<Utc>, DateFormatError> {
    let naive = parse_statement_datetime(raw)?;
    zone.to_utc(&naive).ok_or_else(|| DateFormatError::Nonexistent {
        value: raw.trim().to_string(),
        zone: zone.to_string(),
    })
}

/// Format a UTC instant as ISO-8601 with milliseconds, e.g. `2023-09-24T16:16:47.000Z`.
pub fn to_iso8601_utc(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Convert a statement timestamp straight to its ISO-8601 UTC form.
pub fn statement_timestamp_to_iso8601(
    raw: &str,
    zone: &StatementZone,
) -> Result<String, DateFormatError> {
    parse_statement_timestamp(raw, zone).map(to_iso8601_utc)
}
