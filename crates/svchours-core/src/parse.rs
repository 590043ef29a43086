//! Input parsing for timestamps, intervals and days.
//!
//! Timestamps are accepted as:
//! - `rfc3339`: RFC3339 strings with an offset (e.g., `2025-04-01T08:00:00+08:00`)
//! - `local`: naive local time in the reference timezone (e.g., `2025-04-01T08:00:00`)
//! - `epoch_ms`: Unix epoch milliseconds
//! - `epoch_s`: Unix epoch seconds
//!
//! Intervals use ISO 8601 interval notation, `<start>/<end>`; an empty end
//! (`<start>/`) marks an ongoing interval.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{Result, ServiceHoursError};
use crate::models::{Interval, OpenInterval};
use crate::tz::local_to_utc;

const LOCAL_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Supported timestamp formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampFormat {
    /// Detect the format from the input.
    #[default]
    Auto,
    /// RFC3339 format (e.g., "2025-04-01T08:00:00+08:00")
    Rfc3339,
    /// Local time without offset, read in the reference timezone
    Local,
    /// Unix epoch milliseconds (e.g., "1743465600000")
    EpochMs,
    /// Unix epoch seconds (e.g., "1743465600")
    EpochS,
}

impl std::fmt::Display for TimestampFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimestampFormat::Auto => write!(f, "auto"),
            TimestampFormat::Rfc3339 => write!(f, "rfc3339"),
            TimestampFormat::Local => write!(f, "local"),
            TimestampFormat::EpochMs => write!(f, "epoch_ms"),
            TimestampFormat::EpochS => write!(f, "epoch_s"),
        }
    }
}

impl FromStr for TimestampFormat {
    type Err = ServiceHoursError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(TimestampFormat::Auto),
            "rfc3339" => Ok(TimestampFormat::Rfc3339),
            "local" => Ok(TimestampFormat::Local),
            "epoch_ms" => Ok(TimestampFormat::EpochMs),
            "epoch_s" => Ok(TimestampFormat::EpochS),
            _ => Err(ServiceHoursError::ParseError(format!(
                "Unknown format: '{}'. Expected 'auto', 'rfc3339', 'local', 'epoch_ms', or 'epoch_s'",
                s
            ))),
        }
    }
}

/// Parse a timestamp string according to the specified format.
///
/// `tz` is only consulted for local (offset-less) input.
///
/// # Examples
///
/// ```
/// use svchours_core::parse::{parse_timestamp, TimestampFormat};
///
/// let tz = chrono_tz::Asia::Singapore;
/// let a = parse_timestamp("2025-04-01T08:00:00+08:00", TimestampFormat::Rfc3339, tz).unwrap();
/// let b = parse_timestamp("2025-04-01T08:00:00", TimestampFormat::Local, tz).unwrap();
/// assert_eq!(a, b);
/// ```
pub fn parse_timestamp(input: &str, format: TimestampFormat, tz: Tz) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();

    match format {
        TimestampFormat::Auto => parse_timestamp_auto(trimmed, tz),
        TimestampFormat::Rfc3339 => parse_rfc3339(trimmed),
        TimestampFormat::Local => parse_local(trimmed, tz),
        TimestampFormat::EpochMs => parse_epoch_ms(trimmed),
        TimestampFormat::EpochS => parse_epoch_s(trimmed),
    }
}

/// Parse epoch milliseconds.
fn parse_epoch_ms(input: &str) -> Result<DateTime<Utc>> {
    let ms: i64 = input.parse().map_err(|_| {
        ServiceHoursError::ParseError(format!(
            "Invalid epoch milliseconds: '{}'. Expected integer value.",
            input
        ))
    })?;

    Utc.timestamp_millis_opt(ms).single().ok_or_else(|| {
        ServiceHoursError::ParseError(format!("Epoch milliseconds out of range: {}", ms))
    })
}

/// Parse epoch seconds.
fn parse_epoch_s(input: &str) -> Result<DateTime<Utc>> {
    let s: i64 = input.parse().map_err(|_| {
        ServiceHoursError::ParseError(format!(
            "Invalid epoch seconds: '{}'. Expected integer value.",
            input
        ))
    })?;

    Utc.timestamp_opt(s, 0).single().ok_or_else(|| {
        ServiceHoursError::ParseError(format!("Epoch seconds out of range: {}", s))
    })
}

/// Parse RFC3339 formatted timestamp.
fn parse_rfc3339(input: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(input)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            ServiceHoursError::ParseError(format!(
                "Invalid RFC3339 timestamp: '{}'. Error: {}",
                input, e
            ))
        })
}

/// Parse an offset-less local time in `tz`.
fn parse_local(input: &str, tz: Tz) -> Result<DateTime<Utc>> {
    LOCAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|local| local_to_utc(local, tz))
        .ok_or_else(|| {
            ServiceHoursError::ParseError(format!(
                "Invalid local time: '{}'. Expected YYYY-MM-DDTHH:MM:SS",
                input
            ))
        })
}

/// Parse a timestamp string, auto-detecting the format.
///
/// Integers are read as epoch milliseconds when larger than 10^10 and as
/// epoch seconds otherwise. Anything else is tried as RFC3339 and then as
/// local time in `tz`.
pub fn parse_timestamp_auto(input: &str, tz: Tz) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();

    if let Ok(num) = trimmed.parse::<i64>() {
        if num.abs() > 10_000_000_000 {
            return parse_epoch_ms(trimmed);
        } else {
            return parse_epoch_s(trimmed);
        }
    }

    parse_rfc3339(trimmed)
        .or_else(|_| parse_local(trimmed, tz))
        .map_err(|_| {
            ServiceHoursError::ParseError(format!(
                "Could not auto-detect format for: '{}'",
                input
            ))
        })
}

/// Parse an ISO 8601 interval `<start>/<end>` whose end may be left empty.
///
/// An empty end (`"<start>/"`) marks an ongoing interval. Each present side
/// is auto-detected. Endpoint order is checked when the interval is resolved.
///
/// ```
/// use svchours_core::parse::parse_open_interval;
///
/// let tz = chrono_tz::Asia::Singapore;
/// let open = parse_open_interval("2025-04-01T08:00:00+08:00/", tz).unwrap();
/// assert!(open.is_ongoing());
/// ```
pub fn parse_open_interval(input: &str, tz: Tz) -> Result<OpenInterval> {
    let (start, end) = input.trim().split_once('/').ok_or_else(|| {
        ServiceHoursError::ParseError(format!(
            "Invalid interval: '{}'. Expected '<start>/<end>' or '<start>/'",
            input
        ))
    })?;

    let endpoint = |side: &str| -> Result<Option<DateTime<Utc>>> {
        let side = side.trim();
        if side.is_empty() {
            Ok(None)
        } else {
            parse_timestamp_auto(side, tz).map(Some)
        }
    };

    Ok(OpenInterval::new(endpoint(start)?, endpoint(end)?))
}

/// Parse an ISO 8601 interval `<start>/<end>` with both endpoints present.
///
/// The result must satisfy `start <= end`.
///
/// ```
/// use svchours_core::parse::parse_interval;
///
/// let tz = chrono_tz::Asia::Singapore;
/// let interval = parse_interval("2025-04-01T08:00:00+08:00/2025-04-01T12:30:00+08:00", tz).unwrap();
/// assert_eq!(interval.duration().num_minutes(), 270);
/// ```
pub fn parse_interval(input: &str, tz: Tz) -> Result<Interval> {
    parse_open_interval(input, tz)?.resolve()
}

/// Parse a calendar day in `YYYY-MM-DD` form.
pub fn parse_day(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|e| {
        ServiceHoursError::InvalidDay(format!("'{}' is not a calendar day: {}", input, e))
    })
}
