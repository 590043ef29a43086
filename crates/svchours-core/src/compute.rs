//! Service-hours splitting and duration computation.
//!
//! An interval is cut at every local midnight it crosses, and each per-day
//! piece is clipped to that day's service window `[opens_at, 24:00)`.
//! Pieces with no time left after clipping are dropped.

use chrono::{DateTime, TimeDelta, Utc};
use tracing::trace;

use crate::error::Result;
use crate::models::{Interval, OpenInterval, Segment, ServiceHours, SplitReport};
use crate::parse::{TimestampFormat, parse_timestamp};
use crate::tz::{day_boundaries, format_local, local_date, local_to_utc};

/// Split an interval into the parts that fall inside service hours.
///
/// The result is in chronological order, and each returned interval lies
/// within a single day's service window. Summing their durations gives the
/// exact overlap of `interval` with service hours.
///
/// # Examples
///
/// ```
/// use svchours_core::compute::split_by_service_hours;
/// use svchours_core::models::{Interval, ServiceHours};
/// use chrono::{TimeZone, Utc};
///
/// let tz = chrono_tz::Asia::Singapore;
/// let start = tz.with_ymd_and_hms(2025, 4, 1, 5, 0, 0).single().unwrap();
/// let end = tz.with_ymd_and_hms(2025, 4, 1, 6, 0, 0).single().unwrap();
/// let interval = Interval::new(start.with_timezone(&Utc), end.with_timezone(&Utc)).unwrap();
///
/// let segments = split_by_service_hours(&interval, &ServiceHours::default());
/// assert_eq!(segments.len(), 1);
/// assert_eq!(segments[0].duration().num_minutes(), 30);
/// ```
pub fn split_by_service_hours(interval: &Interval, hours: &ServiceHours) -> Vec<Interval> {
    let boundaries = day_boundaries(interval.start(), interval.end(), hours.tz);

    let mut cuts = Vec::with_capacity(boundaries.len() + 2);
    cuts.push(interval.start());
    cuts.extend(boundaries);
    cuts.push(interval.end());

    cuts.windows(2)
        .filter_map(|pair| clip_to_service_hours(pair[0], pair[1], hours))
        .collect()
}

/// Clip a single-day piece to that day's service window.
fn clip_to_service_hours(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    hours: &ServiceHours,
) -> Option<Interval> {
    let day = local_date(start, hours.tz);
    let opens = local_to_utc(day.and_time(hours.opens_at), hours.tz);

    let clipped_start = start.max(opens);
    // A piece that ends before opening collapses onto the opening instant.
    let clipped_end = end.max(clipped_start);

    if clipped_end - clipped_start <= TimeDelta::zero() {
        trace!(%start, %end, %day, "dropping piece outside service hours");
        return None;
    }

    Interval::new(clipped_start, clipped_end).ok()
}

/// Split an interval that may be missing endpoints.
///
/// Fails with [`crate::ServiceHoursError::MissingEndpoint`] unless both
/// endpoints are present.
pub fn split_open_interval(open: &OpenInterval, hours: &ServiceHours) -> Result<Vec<Interval>> {
    let interval = open.resolve()?;
    Ok(split_by_service_hours(&interval, hours))
}

/// Total time between `start` and `end` that falls inside service hours.
///
/// Fails with [`crate::ServiceHoursError::InvalidInterval`] if `end` is
/// before `start`.
///
/// # Examples
///
/// ```
/// use svchours_core::compute::duration_within_service_hours;
/// use svchours_core::models::ServiceHours;
/// use chrono::{TimeZone, Utc};
///
/// let tz = chrono_tz::Asia::Singapore;
/// let start = tz.with_ymd_and_hms(2025, 4, 1, 18, 0, 0).single().unwrap();
/// let end = tz.with_ymd_and_hms(2025, 4, 2, 18, 0, 0).single().unwrap();
///
/// let duration = duration_within_service_hours(
///     start.with_timezone(&Utc),
///     end.with_timezone(&Utc),
///     &ServiceHours::default(),
/// )
/// .unwrap();
/// assert_eq!(duration.num_minutes(), 18 * 60 + 30);
/// ```
pub fn duration_within_service_hours(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    hours: &ServiceHours,
) -> Result<TimeDelta> {
    let interval = Interval::new(start, end)?;
    Ok(total_duration(&split_by_service_hours(&interval, hours)))
}

/// Like [`duration_within_service_hours`], with an ongoing interval measured
/// up to `now`.
pub fn duration_within_service_hours_until(
    open: &OpenInterval,
    now: DateTime<Utc>,
    hours: &ServiceHours,
) -> Result<TimeDelta> {
    let interval = open.close_at(now)?;
    duration_within_service_hours(interval.start(), interval.end(), hours)
}

fn total_duration(segments: &[Interval]) -> TimeDelta {
    segments
        .iter()
        .fold(TimeDelta::zero(), |acc, segment| acc + segment.duration())
}

/// Split an interval and format the result for output.
pub fn split_report(interval: &Interval, hours: &ServiceHours) -> SplitReport {
    let segments = split_by_service_hours(interval, hours);
    let total_ms = total_duration(&segments).num_milliseconds();

    SplitReport {
        start_local: format_local(interval.start(), hours.tz),
        end_local: format_local(interval.end(), hours.tz),
        tz: hours.tz.to_string(),
        segments: segments
            .iter()
            .map(|segment| Segment {
                start_local: format_local(segment.start(), hours.tz),
                end_local: format_local(segment.end(), hours.tz),
                duration_ms: segment.duration().num_milliseconds(),
            })
            .collect(),
        total_ms,
    }
}

/// Parse both endpoints and build a [`SplitReport`].
///
/// Both endpoints are read with `format`; offset-less times are read in
/// `hours.tz`.
pub fn split_report_from_strings(
    start: &str,
    end: &str,
    format: TimestampFormat,
    hours: &ServiceHours,
) -> Result<SplitReport> {
    let start = parse_timestamp(start, format, hours.tz)?;
    let end = parse_timestamp(end, format, hours.tz)?;
    let interval = Interval::new(start, end)?;
    Ok(split_report(&interval, hours))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceHoursError;
    use crate::tz::parse_tz;
    use chrono::{NaiveTime, TimeZone};

    fn sgt(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        chrono_tz::Asia::Singapore
            .with_ymd_and_hms(2025, 4, d, h, m, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    fn interval(start: DateTime<Utc>, end: DateTime<Utc>) -> Interval {
        Interval::new(start, end).unwrap()
    }

    fn split(start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Interval> {
        split_by_service_hours(&interval(start, end), &ServiceHours::default())
    }

    fn hours_within(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
        let duration = duration_within_service_hours(start, end, &ServiceHours::default()).unwrap();
        duration.num_milliseconds() as f64 / 3_600_000.0
    }

    #[test]
    fn interval_inside_service_hours_is_unchanged() {
        let original = interval(sgt(1, 8, 0), sgt(1, 12, 30));
        assert_eq!(split(sgt(1, 8, 0), sgt(1, 12, 30)), vec![original]);
        assert_eq!(hours_within(sgt(1, 8, 0), sgt(1, 12, 30)), 4.5);
    }

    #[test]
    fn start_before_opening_is_clipped() {
        assert_eq!(
            split(sgt(1, 5, 0), sgt(1, 6, 0)),
            vec![interval(sgt(1, 5, 30), sgt(1, 6, 0))]
        );
        assert_eq!(hours_within(sgt(1, 5, 0), sgt(1, 6, 0)), 0.5);
    }

    #[test]
    fn overnight_tail_before_opening_is_dropped() {
        assert_eq!(
            split(sgt(1, 18, 0), sgt(2, 1, 0)),
            vec![interval(sgt(1, 18, 0), sgt(2, 0, 0))]
        );
        assert_eq!(hours_within(sgt(1, 18, 0), sgt(2, 1, 0)), 6.0);
    }

    #[test]
    fn multi_day_interval_yields_one_segment_per_day() {
        assert_eq!(
            split(sgt(1, 18, 0), sgt(2, 18, 0)),
            vec![
                interval(sgt(1, 18, 0), sgt(2, 0, 0)),
                interval(sgt(2, 5, 30), sgt(2, 18, 0)),
            ]
        );
        assert_eq!(hours_within(sgt(1, 18, 0), sgt(2, 18, 0)), 18.5);
    }

    #[test]
    fn interval_outside_service_hours_is_empty() {
        assert!(split(sgt(1, 3, 0), sgt(1, 4, 30)).is_empty());
        assert_eq!(hours_within(sgt(1, 3, 0), sgt(1, 4, 30)), 0.0);
    }

    #[test]
    fn full_days_each_contribute_the_whole_window() {
        let segments = split(sgt(1, 0, 0), sgt(4, 0, 0));
        assert_eq!(segments.len(), 3);
        for segment in &segments {
            assert_eq!(segment.duration(), TimeDelta::minutes(18 * 60 + 30));
        }
    }

    #[test]
    fn segments_stay_inside_their_day_window() {
        let hours = ServiceHours::default();
        let segments = split(sgt(1, 3, 15), sgt(5, 23, 45));
        assert_eq!(segments.len(), 5);
        for segment in segments {
            let window = crate::tz::service_window(local_date(segment.start(), hours.tz), &hours)
                .unwrap();
            assert!(window.start() <= segment.start());
            assert!(segment.end() <= window.end());
        }
    }

    #[test]
    fn zero_length_interval_has_no_segments() {
        assert!(split(sgt(1, 8, 0), sgt(1, 8, 0)).is_empty());
        assert_eq!(hours_within(sgt(1, 8, 0), sgt(1, 8, 0)), 0.0);
    }

    #[test]
    fn ending_exactly_at_opening_is_dropped() {
        assert!(split(sgt(1, 4, 0), sgt(1, 5, 30)).is_empty());
    }

    #[test]
    fn starting_at_midnight_belongs_to_the_new_day() {
        assert_eq!(
            split(sgt(2, 0, 0), sgt(2, 7, 0)),
            vec![interval(sgt(2, 5, 30), sgt(2, 7, 0))]
        );
    }

    #[test]
    fn ending_at_midnight_keeps_the_evening() {
        assert_eq!(
            split(sgt(1, 22, 0), sgt(2, 0, 0)),
            vec![interval(sgt(1, 22, 0), sgt(2, 0, 0))]
        );
    }

    #[test]
    fn custom_opening_time() {
        let hours = ServiceHours::new(
            chrono_tz::Asia::Singapore,
            NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
        );
        let segments = split_by_service_hours(&interval(sgt(1, 5, 0), sgt(1, 8, 0)), &hours);
        assert_eq!(segments, vec![interval(sgt(1, 7, 0), sgt(1, 8, 0))]);
    }

    #[test]
    fn inverted_interval_is_rejected() {
        let result =
            duration_within_service_hours(sgt(1, 12, 0), sgt(1, 8, 0), &ServiceHours::default());
        assert!(matches!(result, Err(ServiceHoursError::InvalidInterval(_))));
    }

    #[test]
    fn open_interval_split_requires_end() {
        let open = OpenInterval::new(Some(sgt(1, 8, 0)), None);
        assert_eq!(
            split_open_interval(&open, &ServiceHours::default()).unwrap_err(),
            ServiceHoursError::MissingEndpoint("end")
        );
    }

    #[test]
    fn ongoing_interval_is_bounded_by_now() {
        let open = OpenInterval::new(Some(sgt(1, 4, 0)), None);
        let duration =
            duration_within_service_hours_until(&open, sgt(1, 9, 0), &ServiceHours::default())
                .unwrap();
        assert_eq!(duration, TimeDelta::minutes(210));
    }

    #[test]
    fn split_report_formats_local_segments() {
        let report = split_report(
            &interval(sgt(1, 18, 0), sgt(2, 18, 0)),
            &ServiceHours::default(),
        );
        assert_eq!(report.tz, "Asia/Singapore");
        assert_eq!(report.start_local, "2025-04-01T18:00:00+08:00");
        assert_eq!(report.segments.len(), 2);
        assert_eq!(report.segments[1].start_local, "2025-04-02T05:30:00+08:00");
        assert_eq!(report.total_ms, 66_600_000);
    }

    #[test]
    fn split_report_from_local_strings() {
        let report = split_report_from_strings(
            "2025-04-01T05:00:00",
            "2025-04-01T06:00:00",
            TimestampFormat::Local,
            &ServiceHours::default(),
        )
        .unwrap();
        assert_eq!(report.total_ms, 1_800_000);
    }

    #[test]
    fn split_report_from_strings_honours_format() {
        let result = split_report_from_strings(
            "2025-04-01T05:00:00",
            "2025-04-01T06:00:00",
            TimestampFormat::EpochMs,
            &ServiceHours::default(),
        );
        assert!(matches!(result, Err(ServiceHoursError::ParseError(_))));

        let report = split_report_from_strings(
            "1743465600",
            "1743469200",
            TimestampFormat::EpochS,
            &ServiceHours::default(),
        )
        .unwrap();
        assert_eq!(report.start_local, "2025-04-01T08:00:00+08:00");
        assert_eq!(report.total_ms, 3_600_000);
    }

    #[test]
    fn dst_zone_day_window_is_clipped_per_day() {
        // Berlin springs forward on 2026-03-29; the day is 23 hours long.
        let tz = parse_tz("Europe/Berlin").unwrap();
        let hours = ServiceHours::new(tz, NaiveTime::from_hms_opt(5, 30, 0).unwrap());
        let start = tz.with_ymd_and_hms(2026, 3, 29, 0, 0, 0).single().unwrap();
        let end = tz.with_ymd_and_hms(2026, 3, 30, 0, 0, 0).single().unwrap();
        let duration = duration_within_service_hours(
            start.with_timezone(&Utc),
            end.with_timezone(&Utc),
            &hours,
        )
        .unwrap();
        assert_eq!(duration, TimeDelta::minutes(18 * 60 + 30));
    }
}
