//! Timezone handling and calendar-day arithmetic.
//!
//! Day boundaries and service-window edges are computed in local time and
//! converted independently to UTC, so they stay correct in zones with DST
//! even though the reference zone (Asia/Singapore) has none.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{Result, ServiceHoursError};
use crate::models::{Interval, ServiceHours};

/// Parse an IANA timezone name into a [`chrono_tz::Tz`].
///
/// # Examples
///
/// ```
/// use svchours_core::tz::parse_tz;
///
/// let tz = parse_tz("Asia/Singapore").unwrap();
/// assert_eq!(tz.to_string(), "Asia/Singapore");
/// ```
pub fn parse_tz(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| ServiceHoursError::InvalidTimezone(name.to_string()))
}

/// Convert a UTC datetime to local time in the specified timezone.
pub fn utc_to_local(utc: DateTime<Utc>, tz: Tz) -> DateTime<Tz> {
    utc.with_timezone(&tz)
}

/// Convert a local datetime in a specific timezone to UTC.
///
/// Ambiguous times (DST fall back) resolve to the earlier occurrence.
/// Nonexistent times (DST spring forward) shift forward to the first valid
/// local minute.
pub fn local_to_utc(local: NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    if let Some(dt) = tz.from_local_datetime(&local).earliest() {
        return dt.with_timezone(&Utc);
    }

    // Gaps are at most a few hours wide in practice.
    let mut candidate = local;
    for _ in 0..(24 * 60) {
        candidate += TimeDelta::minutes(1);
        if let Some(dt) = tz.from_local_datetime(&candidate).earliest() {
            return dt.with_timezone(&Utc);
        }
    }

    local.and_utc()
}

/// Convert local midnight at the start of `date` to UTC.
pub fn local_midnight_to_utc(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    local_to_utc(date.and_time(NaiveTime::MIN), tz)
}

/// The civil date of `instant` in `tz`.
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    utc_to_local(instant, tz).date_naive()
}

/// The whole calendar day `[00:00, next 00:00)` of `date` in `tz`.
pub fn day_window(date: NaiveDate, tz: Tz) -> Result<Interval> {
    let next = date
        .succ_opt()
        .ok_or_else(|| ServiceHoursError::InvalidDay(format!("no day follows {}", date)))?;
    Interval::new(
        local_midnight_to_utc(date, tz),
        local_midnight_to_utc(next, tz),
    )
}

/// The service window `[opens_at, next 00:00)` of `date`.
///
/// # Examples
///
/// ```
/// use svchours_core::models::ServiceHours;
/// use svchours_core::tz::service_window;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
/// let window = service_window(date, &ServiceHours::default()).unwrap();
///
/// assert_eq!(window.duration().num_minutes(), 18 * 60 + 30);
/// ```
pub fn service_window(date: NaiveDate, hours: &ServiceHours) -> Result<Interval> {
    let day = day_window(date, hours.tz)?;
    let opens = local_to_utc(date.and_time(hours.opens_at), hours.tz);
    Interval::new(opens.min(day.end()), day.end())
}

/// Every local midnight strictly inside `(start, end)`, in order.
///
/// A `start` or `end` that is itself midnight contributes no boundary, so an
/// interval confined to one calendar day yields an empty list.
///
/// # Examples
///
/// ```
/// use svchours_core::tz::day_boundaries;
/// use chrono::{TimeZone, Utc};
///
/// let tz = chrono_tz::Asia::Singapore;
/// let start = tz.with_ymd_and_hms(2025, 4, 1, 18, 30, 0).single().unwrap();
/// let end = tz.with_ymd_and_hms(2025, 4, 5, 4, 30, 0).single().unwrap();
/// let (start, end) = (start.with_timezone(&Utc), end.with_timezone(&Utc));
///
/// assert_eq!(day_boundaries(start, end, tz).len(), 4);
/// ```
pub fn day_boundaries(start: DateTime<Utc>, end: DateTime<Utc>, tz: Tz) -> Vec<DateTime<Utc>> {
    let mut boundaries = Vec::new();
    let mut date = local_date(start, tz);

    while let Some(next) = date.succ_opt() {
        let midnight = local_midnight_to_utc(next, tz);
        if midnight >= end {
            break;
        }
        if midnight > start {
            boundaries.push(midnight);
        }
        date = next;
    }

    boundaries
}

/// Format a datetime as RFC3339 with timezone offset.
///
/// Milliseconds are included only when non-zero.
pub fn format_rfc3339<T: TimeZone>(dt: &DateTime<T>) -> String
where
    T::Offset: std::fmt::Display,
{
    if dt.timestamp_subsec_millis() == 0 {
        dt.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
    } else {
        dt.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string()
    }
}

/// Format a UTC instant as RFC3339 local time in `tz`.
pub fn format_local(dt: DateTime<Utc>, tz: Tz) -> String {
    format_rfc3339(&utc_to_local(dt, tz))
}
