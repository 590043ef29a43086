//! Core data types for svchours.
//!
//! This module defines the primary types used throughout the library:
//! - [`Interval`] - A well-formed `[start, end]` pair of instants
//! - [`OpenInterval`] - An interval whose endpoints may still be unknown
//! - [`ServiceHours`] - The daily service window and its reference timezone
//! - [`IssueType`] - The closed set of incident categories
//! - [`Segment`] / [`SplitReport`] - Serializable split results

use std::str::FromStr;

use chrono::{DateTime, NaiveTime, TimeDelta, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ServiceHoursError};

/// A time interval with `start <= end`.
///
/// The fields are private so a value can only be obtained through
/// [`Interval::new`], which rejects inverted endpoints. Degenerate intervals
/// (`start == end`) are allowed and carry zero duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Interval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Interval {
    /// Build an interval, failing if `end` is before `start`.
    ///
    /// # Examples
    ///
    /// ```
    /// use svchours_core::models::Interval;
    /// use chrono::{TimeZone, Utc};
    ///
    /// let start = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
    /// let end = Utc.with_ymd_and_hms(2025, 4, 1, 4, 30, 0).unwrap();
    ///
    /// assert!(Interval::new(start, end).is_ok());
    /// assert!(Interval::new(end, start).is_err());
    /// ```
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end < start {
            return Err(ServiceHoursError::InvalidInterval(format!(
                "end '{}' is before start '{}'",
                end.to_rfc3339(),
                start.to_rfc3339()
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Elapsed time between start and end. Never negative.
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether the two intervals share a non-empty stretch of time.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The smallest interval covering both.
    pub fn hull(&self, other: &Interval) -> Interval {
        Interval {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// The common part of two intervals, or `None` if they do not overlap.
    pub fn intersection(&self, other: &Interval) -> Option<Interval> {
        if !self.overlaps(other) {
            return None;
        }
        Some(Interval {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        })
    }
}

/// An interval as reported upstream, where either endpoint may be missing.
///
/// A missing end means the incident is still ongoing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenInterval {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl OpenInterval {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    pub fn is_ongoing(&self) -> bool {
        self.end.is_none()
    }

    /// Require both endpoints and build a well-formed [`Interval`].
    pub fn resolve(&self) -> Result<Interval> {
        let start = self
            .start
            .ok_or(ServiceHoursError::MissingEndpoint("start"))?;
        let end = self.end.ok_or(ServiceHoursError::MissingEndpoint("end"))?;
        Interval::new(start, end)
    }

    /// Resolve the interval, treating a missing end as `now`.
    ///
    /// An ongoing interval that starts after `now` collapses to an empty
    /// interval at its start. A recorded end is kept as is.
    pub fn close_at(&self, now: DateTime<Utc>) -> Result<Interval> {
        let start = self
            .start
            .ok_or(ServiceHoursError::MissingEndpoint("start"))?;
        match self.end {
            Some(end) => Interval::new(start, end),
            None => Interval::new(start, now.max(start)),
        }
    }
}

/// The daily window during which the transit system is in service.
///
/// The window opens at `opens_at` local time and closes at the following
/// local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceHours {
    /// Reference timezone in which days and opening times are civil.
    pub tz: Tz,
    /// Local time at which service starts each day (inclusive).
    pub opens_at: NaiveTime,
}

impl ServiceHours {
    /// Reference timezone of the transit system.
    pub const REFERENCE_TZ: Tz = chrono_tz::Asia::Singapore;

    pub fn new(tz: Tz, opens_at: NaiveTime) -> Self {
        Self { tz, opens_at }
    }
}

impl Default for ServiceHours {
    /// 05:30 to 24:00 in Asia/Singapore.
    fn default() -> Self {
        Self {
            tz: Self::REFERENCE_TZ,
            opens_at: NaiveTime::from_hms_opt(5, 30, 0).expect("05:30 is a valid time"),
        }
    }
}

/// Incident category.
///
/// This is a closed set: daily aggregation always reports every variant,
/// defaulting to zero.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    Disruption,
    Maintenance,
    Infra,
}

impl IssueType {
    /// All recognised categories, in reporting order.
    pub const ALL: [IssueType; 3] = [
        IssueType::Disruption,
        IssueType::Maintenance,
        IssueType::Infra,
    ];
}

impl std::fmt::Display for IssueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueType::Disruption => write!(f, "disruption"),
            IssueType::Maintenance => write!(f, "maintenance"),
            IssueType::Infra => write!(f, "infra"),
        }
    }
}

impl FromStr for IssueType {
    type Err = ServiceHoursError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "disruption" => Ok(IssueType::Disruption),
            "maintenance" => Ok(IssueType::Maintenance),
            "infra" => Ok(IssueType::Infra),
            _ => Err(ServiceHoursError::ParseError(format!(
                "Unknown issue type: '{}'. Expected 'disruption', 'maintenance', or 'infra'",
                s
            ))),
        }
    }
}

/// One service-hours segment, formatted for output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// Segment start in local time with offset (RFC3339 format).
    pub start_local: String,
    /// Segment end in local time with offset (RFC3339 format).
    pub end_local: String,
    /// Segment length in milliseconds.
    pub duration_ms: i64,
}

/// Complete result of splitting one interval by service hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitReport {
    /// Interval start in local time with offset (RFC3339 format).
    pub start_local: String,
    /// Interval end in local time with offset (RFC3339 format).
    pub end_local: String,
    /// The timezone used for day boundaries.
    pub tz: String,
    /// Surviving segments in chronological order.
    pub segments: Vec<Segment>,
    /// Sum of segment durations in milliseconds.
    pub total_ms: i64,
}
