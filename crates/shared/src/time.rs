//! Timestamp parsing and calendar-day helpers.
//!
//! Proximity events arrive from the data layer with `created_at` values in
//! whatever shape the upstream store produced. Parsing is lenient: anything
//! that cannot be read becomes "missing" rather than failing the payload.

use chrono::{
    DateTime, Datelike, Days, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc,
};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Seconds in one minute, used for offset conversion.
const SECONDS_PER_MINUTE: i32 = 60;

/// Earliest calendar year accepted for an event timestamp.
pub const MIN_SUPPORTED_YEAR: i32 = 1;

/// Latest calendar year accepted for an event timestamp.
pub const MAX_SUPPORTED_YEAR: i32 = 9999;

/// Errors produced while parsing a timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("Timestamp is empty")]
    Empty,

    #[error("Timestamp must be positive: {0}")]
    NonPositive(i64),

    #[error("Unrecognized timestamp format: {0}")]
    UnrecognizedFormat(String),

    #[error("Timestamp outside supported years: {0}")]
    OutOfRange(String),
}

/// Whether `instant` falls in a year every UTC offset can represent.
///
/// Local-time conversion near chrono's limits overflows, so instants
/// outside this window are treated as missing.
pub fn is_supported_instant(instant: DateTime<Utc>) -> bool {
    (MIN_SUPPORTED_YEAR..=MAX_SUPPORTED_YEAR).contains(&instant.year())
}

/// Parse a timestamp from milliseconds, RFC 3339, or a naive ISO 8601 string.
///
/// Naive values (no offset) are assumed to be UTC. Instants outside
/// [`MIN_SUPPORTED_YEAR`]..=[`MAX_SUPPORTED_YEAR`] are rejected.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
    let parsed = parse_any_timestamp(raw)?;
    if is_supported_instant(parsed) {
        Ok(parsed)
    } else {
        Err(TimestampError::OutOfRange(raw.trim().to_string()))
    }
}

fn parse_any_timestamp(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(TimestampError::Empty);
    }

    // Try parsing as integer (milliseconds)
    if let Ok(millis) = value.parse::<i64>() {
        if millis <= 0 {
            return Err(TimestampError::NonPositive(millis));
        }
        return DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| TimestampError::UnrecognizedFormat(value.to_string()));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Postgres text output, e.g. "2025-07-05 14:22:49.123+00"
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }

    Err(TimestampError::UnrecognizedFormat(value.to_string()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Millis(i64),
    Other(IgnoredAny),
}

/// Serde helper for optional timestamps that must never reject a payload.
///
/// Missing, null, malformed and non-string values all deserialize to `None`.
pub fn deserialize_lenient_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawTimestamp>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawTimestamp::Text(text)) => parse_timestamp(&text).ok(),
        Some(RawTimestamp::Millis(millis)) if millis > 0 => {
            DateTime::from_timestamp_millis(millis).filter(|dt| is_supported_instant(*dt))
        }
        _ => None,
    })
}

/// Build a fixed UTC offset from a number of minutes east of UTC.
pub fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    minutes
        .checked_mul(SECONDS_PER_MINUTE)
        .and_then(FixedOffset::east_opt)
}

/// Calendar date of an instant as seen from `offset`.
pub fn local_date(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    instant.with_timezone(&offset).date_naive()
}

/// First instant of `date` in the `offset` time zone.
pub fn start_of_day(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN)
        .checked_sub_signed(TimeDelta::seconds(i64::from(offset.local_minus_utc())))
        .map(|naive| naive.and_utc())
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Last representable instant of `date` in the `offset` time zone.
pub fn end_of_day(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    date.checked_add_days(Days::new(1))
        .map(|next| start_of_day(next, offset) - TimeDelta::nanoseconds(1))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// ISO day key (`yyyy-MM-dd`); sorts lexicographically in date order.
pub fn format_day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Short day label (`dd/MM`).
pub fn format_day_label(date: NaiveDate) -> String {
    date.format("%d/%m").to_string()
}

/// Local date-time label (`dd/MM/yyyy HH:mm`).
pub fn format_datetime_label(instant: DateTime<Utc>, offset: FixedOffset) -> String {
    instant
        .with_timezone(&offset)
        .format("%d/%m/%Y %H:%M")
        .to_string()
}

/// Hour bucket label (`HH:00`).
pub fn format_hour_label(hour: u32) -> String {
    format!("{:02}:00", hour)
}
