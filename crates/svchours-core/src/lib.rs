//! # svchours-core
//!
//! Service-hours aware interval and duration computation for transit
//! incident data.
//!
//! The transit system is "in service" every day from 05:30 until midnight,
//! civil time in Asia/Singapore. This library answers how much of an
//! incident falls inside that window.
//!
//! ## Features
//!
//! - **Day boundaries**: Enumerate the local midnights an interval crosses.
//! - **Service-hours splitting**: Cut an interval per calendar day and clip
//!   each piece to the service window.
//! - **Durations**: Sum the in-service time of an interval, including
//!   ongoing intervals measured up to an explicit `now`.
//! - **Daily aggregation**: Per-issue-type totals for one day, with
//!   overlapping reports merged so nothing is counted twice.
//! - **IANA Timezones**: Any zone via chrono-tz, DST handled per boundary.
//!
//! ## Example
//!
//! ```rust
//! use svchours_core::prelude::*;
//!
//! let hours = ServiceHours::default();
//! let start = parse_timestamp_auto("2025-04-01T18:00:00", hours.tz).unwrap();
//! let end = parse_timestamp_auto("2025-04-02T18:00:00", hours.tz).unwrap();
//!
//! let duration = duration_within_service_hours(start, end, &hours).unwrap();
//! assert_eq!(duration.num_minutes(), 18 * 60 + 30);
//! ```

pub mod compute;
pub mod daily;
pub mod error;
pub mod models;
pub mod parse;
pub mod tz;

// Re-export commonly used types at the crate root
pub use compute::{
    duration_within_service_hours, duration_within_service_hours_until, split_by_service_hours,
    split_open_interval, split_report, split_report_from_strings,
};
pub use daily::{day_issue_type_durations, day_issue_type_durations_on, merge_intervals};
pub use error::{Result, ServiceHoursError};
pub use models::{Interval, IssueType, OpenInterval, Segment, ServiceHours, SplitReport};
pub use parse::{
    TimestampFormat, parse_day, parse_interval, parse_open_interval, parse_timestamp,
    parse_timestamp_auto,
};
pub use tz::day_boundaries;

/// Prelude module for convenient imports.
///
/// ```
/// use svchours_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::compute::{
        duration_within_service_hours, duration_within_service_hours_until,
        split_by_service_hours, split_open_interval, split_report, split_report_from_strings,
    };
    pub use crate::daily::{day_issue_type_durations, day_issue_type_durations_on, merge_intervals};
    pub use crate::error::{Result, ServiceHoursError};
    pub use crate::models::*;
    pub use crate::parse::{
        TimestampFormat, parse_day, parse_interval, parse_open_interval, parse_timestamp,
        parse_timestamp_auto,
    };
    pub use crate::tz::{day_boundaries, parse_tz, service_window};
}
