//! Per-day incident duration by issue type.
//!
//! Intervals within a category are merged before summation so that
//! overlapping reports of the same incident are not counted twice. The
//! result measures raw overlap with the day and is not clipped to service
//! hours.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::error::Result;
use crate::models::{Interval, IssueType};
use crate::parse::parse_open_interval;
use crate::tz::{day_window, local_date};

/// Merge overlapping or touching intervals into a minimal disjoint set.
///
/// The output is sorted by start. Two intervals are fused when the next one
/// starts no later than the current merged one ends.
///
/// # Examples
///
/// ```
/// use svchours_core::daily::merge_intervals;
/// use svchours_core::models::Interval;
/// use chrono::{TimeZone, Utc};
///
/// let at = |h| Utc.with_ymd_and_hms(2025, 4, 1, h, 0, 0).single().unwrap();
/// let merged = merge_intervals(vec![
///     Interval::new(at(10), at(12)).unwrap(),
///     Interval::new(at(8), at(11)).unwrap(),
/// ]);
///
/// assert_eq!(merged, vec![Interval::new(at(8), at(12)).unwrap()]);
/// ```
pub fn merge_intervals(mut intervals: Vec<Interval>) -> Vec<Interval> {
    intervals.sort_by_key(|interval| interval.start());

    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for next in intervals {
        match merged.last_mut() {
            Some(current) if next.start() <= current.end() => *current = current.hull(&next),
            _ => merged.push(next),
        }
    }

    merged
}

/// Total milliseconds each issue type spent on `day`, up to `now`.
///
/// `day` may be any instant on the calendar day of interest in `tz`. Only
/// the part of the day that has already happened (`[day start, min(now,
/// day end)]`) is counted. Every [`IssueType`] appears in the result, with
/// zero for categories that have no intervals.
///
/// Intervals are `"<start>/<end>"` strings; an empty end (`"<start>/"`)
/// marks an ongoing incident, which is measured up to `now`.
///
/// Fails if a serialized interval is malformed, inverted or has no start.
pub fn day_issue_type_durations(
    day: DateTime<Utc>,
    intervals_by_category: &HashMap<IssueType, Vec<String>>,
    now: DateTime<Utc>,
    tz: Tz,
) -> Result<BTreeMap<IssueType, i64>> {
    day_issue_type_durations_on(local_date(day, tz), intervals_by_category, now, tz)
}

/// Same as [`day_issue_type_durations`], addressed by calendar date.
pub fn day_issue_type_durations_on(
    date: NaiveDate,
    intervals_by_category: &HashMap<IssueType, Vec<String>>,
    now: DateTime<Utc>,
    tz: Tz,
) -> Result<BTreeMap<IssueType, i64>> {
    let mut totals: BTreeMap<IssueType, i64> =
        IssueType::ALL.iter().map(|issue_type| (*issue_type, 0)).collect();

    let day = day_window(date, tz)?;
    let bound_end = now.min(day.end());
    let Ok(window) = Interval::new(day.start(), bound_end) else {
        debug!(%date, %now, "day has not started yet");
        return Ok(totals);
    };

    for (issue_type, raw) in intervals_by_category {
        let parsed = raw
            .iter()
            .map(|entry| parse_open_interval(entry, tz)?.close_at(now))
            .collect::<Result<Vec<_>>>()?;
        let merged = merge_intervals(parsed);
        debug!(%issue_type, raw = raw.len(), merged = merged.len(), "merged intervals");

        let total_ms: i64 = merged
            .iter()
            .filter_map(|interval| interval.intersection(&window))
            .map(|overlap| overlap.duration().num_milliseconds())
            .sum();
        totals.insert(*issue_type, total_ms);
    }

    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceHoursError;
    use chrono::TimeZone;

    const SGT: Tz = chrono_tz::Asia::Singapore;

    fn sgt(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        SGT.with_ymd_and_hms(2025, 4, d, h, m, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    fn interval(start: DateTime<Utc>, end: DateTime<Utc>) -> Interval {
        Interval::new(start, end).unwrap()
    }

    fn categories(entries: Vec<(IssueType, Vec<&str>)>) -> HashMap<IssueType, Vec<String>> {
        entries
            .into_iter()
            .map(|(issue_type, raw)| (issue_type, raw.into_iter().map(String::from).collect()))
            .collect()
    }

    #[test]
    fn merge_fuses_overlapping_and_touching() {
        let merged = merge_intervals(vec![
            interval(sgt(1, 14, 0), sgt(1, 15, 0)),
            interval(sgt(1, 8, 0), sgt(1, 10, 0)),
            interval(sgt(1, 9, 0), sgt(1, 11, 0)),
            interval(sgt(1, 11, 0), sgt(1, 12, 0)),
        ]);
        assert_eq!(
            merged,
            vec![
                interval(sgt(1, 8, 0), sgt(1, 12, 0)),
                interval(sgt(1, 14, 0), sgt(1, 15, 0)),
            ]
        );
    }

    #[test]
    fn merge_keeps_contained_interval_inside() {
        let merged = merge_intervals(vec![
            interval(sgt(1, 8, 0), sgt(1, 18, 0)),
            interval(sgt(1, 9, 0), sgt(1, 10, 0)),
        ]);
        assert_eq!(merged, vec![interval(sgt(1, 8, 0), sgt(1, 18, 0))]);
    }

    #[test]
    fn merge_is_idempotent_on_disjoint_input() {
        let disjoint = vec![
            interval(sgt(1, 8, 0), sgt(1, 9, 0)),
            interval(sgt(1, 10, 0), sgt(1, 11, 0)),
        ];
        assert_eq!(merge_intervals(disjoint.clone()), disjoint);
        assert!(merge_intervals(Vec::new()).is_empty());
    }

    #[test]
    fn overlapping_reports_are_not_double_counted() {
        let input = categories(vec![(
            IssueType::Disruption,
            vec![
                "2025-04-01T08:00:00+08:00/2025-04-01T10:00:00+08:00",
                "2025-04-01T09:00:00+08:00/2025-04-01T11:00:00+08:00",
            ],
        )]);
        let totals = day_issue_type_durations(sgt(1, 12, 0), &input, sgt(2, 12, 0), SGT).unwrap();
        assert_eq!(totals[&IssueType::Disruption], 3 * 3_600_000);
    }

    #[test]
    fn every_category_is_reported() {
        let totals =
            day_issue_type_durations(sgt(1, 0, 0), &HashMap::new(), sgt(2, 0, 0), SGT).unwrap();
        assert_eq!(totals.len(), 3);
        assert!(totals.values().all(|ms| *ms == 0));
    }

    #[test]
    fn overlap_is_clipped_to_the_day() {
        let input = categories(vec![(
            IssueType::Maintenance,
            vec!["2025-03-31T22:00:00+08:00/2025-04-02T02:00:00+08:00"],
        )]);
        let totals = day_issue_type_durations(sgt(1, 9, 0), &input, sgt(5, 0, 0), SGT).unwrap();
        assert_eq!(totals[&IssueType::Maintenance], 24 * 3_600_000);
    }

    #[test]
    fn night_time_is_counted_without_service_hours_clipping() {
        let input = categories(vec![(
            IssueType::Infra,
            vec!["2025-04-01T01:00:00+08:00/2025-04-01T04:00:00+08:00"],
        )]);
        let totals = day_issue_type_durations(sgt(1, 9, 0), &input, sgt(2, 0, 0), SGT).unwrap();
        assert_eq!(totals[&IssueType::Infra], 3 * 3_600_000);
    }

    #[test]
    fn future_part_of_the_day_is_excluded() {
        let input = categories(vec![(
            IssueType::Disruption,
            vec!["2025-04-01T08:00:00+08:00/2025-04-01T20:00:00+08:00"],
        )]);
        let totals = day_issue_type_durations(sgt(1, 0, 0), &input, sgt(1, 10, 30), SGT).unwrap();
        assert_eq!(totals[&IssueType::Disruption], 150 * 60_000);
    }

    #[test]
    fn day_in_the_future_is_all_zero() {
        let input = categories(vec![(
            IssueType::Disruption,
            vec!["2025-04-03T08:00:00+08:00/2025-04-03T20:00:00+08:00"],
        )]);
        let totals = day_issue_type_durations(sgt(3, 0, 0), &input, sgt(1, 12, 0), SGT).unwrap();
        assert_eq!(totals[&IssueType::Disruption], 0);
    }

    #[test]
    fn intervals_on_other_days_are_ignored() {
        let input = categories(vec![
            (
                IssueType::Disruption,
                vec!["2025-04-02T08:00:00+08:00/2025-04-02T09:00:00+08:00"],
            ),
            (
                IssueType::Maintenance,
                vec!["2025-04-01T08:00:00+08:00/2025-04-01T08:45:00+08:00"],
            ),
        ]);
        let totals = day_issue_type_durations(sgt(1, 0, 0), &input, sgt(3, 0, 0), SGT).unwrap();
        assert_eq!(totals[&IssueType::Disruption], 0);
        assert_eq!(totals[&IssueType::Maintenance], 45 * 60_000);
        assert_eq!(totals[&IssueType::Infra], 0);
    }

    #[test]
    fn ongoing_interval_is_measured_up_to_now() {
        let input = categories(vec![(IssueType::Disruption, vec!["2025-04-01T08:00:00+08:00/"])]);
        let totals = day_issue_type_durations(sgt(1, 0, 0), &input, sgt(1, 10, 0), SGT).unwrap();
        assert_eq!(totals[&IssueType::Disruption], 2 * 3_600_000);
    }

    #[test]
    fn ongoing_interval_merges_with_closed_reports() {
        let input = categories(vec![(
            IssueType::Maintenance,
            vec![
                "2025-04-01T07:00:00+08:00/2025-04-01T09:00:00+08:00",
                "2025-04-01T08:30:00+08:00/",
            ],
        )]);
        let totals = day_issue_type_durations(sgt(1, 0, 0), &input, sgt(1, 12, 0), SGT).unwrap();
        assert_eq!(totals[&IssueType::Maintenance], 5 * 3_600_000);
    }

    #[test]
    fn ongoing_interval_without_start_is_an_error() {
        let input = categories(vec![(IssueType::Infra, vec!["/"])]);
        let result = day_issue_type_durations(sgt(1, 0, 0), &input, sgt(2, 0, 0), SGT);
        assert_eq!(result.unwrap_err(), ServiceHoursError::MissingEndpoint("start"));
    }

    #[test]
    fn malformed_interval_is_an_error() {
        let input = categories(vec![(IssueType::Infra, vec!["2025-04-01T08:00:00+08:00"])]);
        let result = day_issue_type_durations(sgt(1, 0, 0), &input, sgt(2, 0, 0), SGT);
        assert!(matches!(result, Err(ServiceHoursError::ParseError(_))));
    }

    #[test]
    fn addressed_by_date() {
        let input = categories(vec![(
            IssueType::Disruption,
            vec!["2025-04-01T08:00:00/2025-04-01T09:00:00"],
        )]);
        let date = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let totals = day_issue_type_durations_on(date, &input, sgt(2, 0, 0), SGT).unwrap();
        assert_eq!(totals[&IssueType::Disruption], 3_600_000);
    }
}
