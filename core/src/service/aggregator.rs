//! Read-only views over a snapshot of leave records: counts, recent lists,
//! filters, search and chart series for the dashboard.
//!
//! Nothing here fails. Records with missing or unreadable fields fall back to
//! defaults (the "Other" leave type, "oldest" ordering, exclusion from
//! time-windowed views) so the dashboard always renders.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use serde::Serialize;

use crate::model::leave::{LeaveRecord, LeaveStatus, StatusFilter};
use crate::time::{month_label, shift_month};

#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    /// Every record, including ones with an unrecognised status.
    pub total: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MonthBucket {
    pub label: String,
    pub year: i32,
    pub month: u32,
    pub count: usize,
}

pub fn count_by_status<'a, I>(records: I) -> StatusCounts
where
    I: IntoIterator<Item = &'a LeaveRecord>,
{
    records
        .into_iter()
        .fold(StatusCounts::default(), |mut counts, record| {
            match record.status {
                LeaveStatus::Pending => counts.pending += 1,
                LeaveStatus::Approved => counts.approved += 1,
                LeaveStatus::Rejected => counts.rejected += 1,
                LeaveStatus::Other(_) => {}
            }
            counts.total += 1;
            counts
        })
}

/// Newest first. The sort is stable and records without a timestamp go last.
pub fn recent_by_timestamp<'a, I>(records: I, limit: usize) -> Vec<&'a LeaveRecord>
where
    I: IntoIterator<Item = &'a LeaveRecord>,
{
    let mut sorted: Vec<&LeaveRecord> = records.into_iter().collect();
    // Option orders None below Some, so reversing puts missing timestamps last.
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    sorted.truncate(limit);
    sorted
}

pub fn filter_by_status<'a, I>(records: I, filter: &StatusFilter) -> Vec<&'a LeaveRecord>
where
    I: IntoIterator<Item = &'a LeaveRecord>,
{
    records
        .into_iter()
        .filter(|r| filter.matches(&r.status))
        .collect()
}

pub fn filter_by_status_and_age<'a, I>(
    records: I,
    filter: &StatusFilter,
    max_age_days: i64,
) -> Vec<&'a LeaveRecord>
where
    I: IntoIterator<Item = &'a LeaveRecord>,
{
    filter_by_status_and_age_at(records, filter, max_age_days, Utc::now())
}

/// Keeps records matching `filter` submitted no earlier than `max_age_days` before `now`.
/// Undated records never match and a negative age matches nothing.
pub fn filter_by_status_and_age_at<'a, I>(
    records: I,
    filter: &StatusFilter,
    max_age_days: i64,
    now: DateTime<Utc>,
) -> Vec<&'a LeaveRecord>
where
    I: IntoIterator<Item = &'a LeaveRecord>,
{
    if max_age_days < 0 {
        return Vec::new();
    }
    // A window reaching past the calendar's range has no lower bound.
    let cutoff = Duration::try_days(max_age_days).and_then(|age| now.checked_sub_signed(age));
    records
        .into_iter()
        .filter(|r| filter.matches(&r.status))
        .filter(|r| match (r.timestamp, cutoff) {
            (Some(ts), Some(cutoff)) => ts >= cutoff,
            (Some(_), None) => true,
            (None, _) => false,
        })
        .collect()
}

/// Case-insensitive match on name, PRN, branch or division. A blank query keeps everything.
pub fn search_by_text<'a, I>(records: I, query: &str) -> Vec<&'a LeaveRecord>
where
    I: IntoIterator<Item = &'a LeaveRecord>,
{
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.into_iter().collect();
    }

    records
        .into_iter()
        .filter(|r| {
            [&r.full_name, &r.prn, &r.branch, &r.division]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Counts per leave type in order of first appearance.
pub fn group_by_leave_type<'a, I>(records: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a LeaveRecord>,
{
    let mut groups: Vec<(String, usize)> = Vec::new();
    for record in records {
        let label = record.leave_type_label();
        match groups.iter_mut().find(|(existing, _)| existing == label) {
            Some((_, count)) => *count += 1,
            None => groups.push((label.to_string(), 1)),
        }
    }
    groups
}

pub fn monthly_trend<'a, I>(records: I, months_back: usize) -> Vec<MonthBucket>
where
    I: IntoIterator<Item = &'a LeaveRecord>,
{
    monthly_trend_at(records, months_back, chrono::Local::now())
}

/// Zero-filled submission counts for the `months_back` months ending with the month
/// of `now`, oldest first. Months are taken in `now`'s time zone.
pub fn monthly_trend_at<'a, I, Tz>(records: I, months_back: usize, now: DateTime<Tz>) -> Vec<MonthBucket>
where
    I: IntoIterator<Item = &'a LeaveRecord>,
    Tz: TimeZone,
{
    let (year, month) = (now.year(), now.month());
    let mut buckets: Vec<MonthBucket> = (0..months_back)
        .rev()
        .map(|back| {
            let delta = i64::try_from(back).map_or(i64::MIN, |back| -back);
            let (y, m) = shift_month(year, month, delta);
            MonthBucket {
                label: month_label(y, m),
                year: y,
                month: m,
                count: 0,
            }
        })
        .collect();

    let tz = now.timezone();
    for record in records {
        let Some(ts) = record.timestamp else {
            continue;
        };
        let local = ts.with_timezone(&tz);
        if let Some(bucket) = buckets
            .iter_mut()
            .find(|b| b.year == local.year() && b.month == local.month())
        {
            bucket.count += 1;
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(prn: &str, status: LeaveStatus, ts: Option<DateTime<Utc>>) -> LeaveRecord {
        LeaveRecord {
            prn: prn.to_string(),
            status,
            timestamp: ts,
            ..Default::default()
        }
    }

    fn at(y: i32, m: u32, d: u32) -> Option<DateTime<Utc>> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).single()
    }

    fn prns(records: &[&LeaveRecord]) -> Vec<String> {
        records.iter().map(|r| r.prn.clone()).collect()
    }

    #[test]
    fn test_count_by_status() {
        let records = vec![
            record("1", LeaveStatus::Pending, None),
            record("2", LeaveStatus::Pending, None),
            record("3", LeaveStatus::Approved, None),
            record("4", LeaveStatus::Rejected, None),
        ];
        assert_eq!(
            count_by_status(&records),
            StatusCounts {
                pending: 2,
                approved: 1,
                rejected: 1,
                total: 4
            }
        );
    }

    #[test]
    fn test_count_by_status_unknown_only_in_total() {
        let records = vec![
            record("1", LeaveStatus::Other("On Hold".to_string()), None),
            record("2", LeaveStatus::Approved, None),
        ];
        let counts = count_by_status(&records);
        assert_eq!(counts.total, 2);
        assert_eq!(counts.pending + counts.approved + counts.rejected, 1);
    }

    #[test]
    fn test_count_by_status_empty() {
        let empty: Vec<LeaveRecord> = Vec::new();
        assert_eq!(count_by_status(&empty), StatusCounts::default());
    }

    #[test]
    fn test_recent_by_timestamp_orders_and_truncates() {
        let records = vec![
            record("old", LeaveStatus::Pending, at(2025, 1, 1)),
            record("none", LeaveStatus::Pending, None),
            record("new", LeaveStatus::Pending, at(2025, 3, 1)),
            record("mid", LeaveStatus::Pending, at(2025, 2, 1)),
        ];
        let recent = recent_by_timestamp(&records, 2);
        assert_eq!(prns(&recent), vec!["new", "mid"]);

        let all = recent_by_timestamp(&records, 10);
        assert_eq!(prns(&all), vec!["new", "mid", "old", "none"]);
    }

    #[test]
    fn test_recent_by_timestamp_is_stable_for_ties() {
        let records = vec![
            record("a", LeaveStatus::Pending, at(2025, 1, 1)),
            record("b", LeaveStatus::Pending, at(2025, 2, 1)),
            record("c", LeaveStatus::Pending, at(2025, 1, 1)),
            record("d", LeaveStatus::Pending, None),
            record("e", LeaveStatus::Pending, None),
        ];
        let recent = recent_by_timestamp(&records, 5);
        assert_eq!(prns(&recent), vec!["b", "a", "c", "d", "e"]);
    }

    #[test]
    fn test_filter_by_status() {
        let records = vec![
            record("1", LeaveStatus::Pending, None),
            record("2", LeaveStatus::Approved, None),
            record("3", LeaveStatus::Pending, None),
        ];
        let pending = filter_by_status(&records, &StatusFilter::Only(LeaveStatus::Pending));
        assert_eq!(prns(&pending), vec!["1", "3"]);
        assert_eq!(filter_by_status(&records, &StatusFilter::All).len(), 3);
    }

    #[test]
    fn test_filter_by_status_and_age() {
        let now = Utc.with_ymd_and_hms(2025, 3, 31, 12, 0, 0).unwrap();
        let records = vec![
            record("fresh", LeaveStatus::Pending, at(2025, 3, 30)),
            record("edge", LeaveStatus::Approved, at(2025, 3, 1)),
            record("stale", LeaveStatus::Pending, at(2025, 2, 28)),
            record("undated", LeaveStatus::Pending, None),
        ];

        let all = filter_by_status_and_age_at(&records, &StatusFilter::All, 30, now);
        assert_eq!(prns(&all), vec!["fresh", "edge"]);

        let pending = filter_by_status_and_age_at(
            &records,
            &StatusFilter::Only(LeaveStatus::Pending),
            30,
            now,
        );
        assert_eq!(prns(&pending), vec!["fresh"]);
    }

    #[test]
    fn test_filter_by_age_out_of_range_windows() {
        let now = Utc.with_ymd_and_hms(2025, 3, 31, 12, 0, 0).unwrap();
        let records = vec![
            record("fresh", LeaveStatus::Pending, at(2025, 3, 30)),
            record("ancient", LeaveStatus::Approved, at(1990, 1, 1)),
            record("undated", LeaveStatus::Pending, None),
        ];

        // Windows older than the calendar keep every dated record.
        for days in [200_000_000, i64::MAX] {
            let kept = filter_by_status_and_age_at(&records, &StatusFilter::All, days, now);
            assert_eq!(prns(&kept), vec!["fresh", "ancient"]);
        }

        // Negative ages select nothing.
        assert!(filter_by_status_and_age_at(&records, &StatusFilter::All, -1, now).is_empty());
        assert!(filter_by_status_and_age_at(&records, &StatusFilter::All, i64::MIN, now).is_empty());
    }

    #[test]
    fn test_search_by_text() {
        let mut asha = record("122B1001", LeaveStatus::Pending, None);
        asha.full_name = "Asha Patil".to_string();
        asha.branch = "Computer".to_string();
        asha.division = "A".to_string();
        let mut ravi = record("122B2002", LeaveStatus::Pending, None);
        ravi.full_name = "Ravi Kumar".to_string();
        ravi.branch = "Mechanical".to_string();
        ravi.division = "B".to_string();
        let records = vec![asha, ravi];

        assert_eq!(prns(&search_by_text(&records, "PATIL")), vec!["122B1001"]);
        assert_eq!(prns(&search_by_text(&records, "b2002")), vec!["122B2002"]);
        assert_eq!(prns(&search_by_text(&records, "mech")), vec!["122B2002"]);
        assert_eq!(search_by_text(&records, "122b").len(), 2);
        assert!(search_by_text(&records, "zzz").is_empty());
    }

    #[test]
    fn test_search_blank_query_is_identity() {
        let records = vec![
            record("1", LeaveStatus::Pending, None),
            record("2", LeaveStatus::Rejected, None),
        ];
        for query in ["", "   "] {
            let found = search_by_text(&records, query);
            assert_eq!(prns(&found), vec!["1", "2"]);
        }
    }

    #[test]
    fn test_group_by_leave_type() {
        let types = ["Medical", "", "Personal", "Medical", "  "];
        let records: Vec<LeaveRecord> = types
            .iter()
            .map(|t| LeaveRecord {
                leave_type: t.to_string(),
                ..Default::default()
            })
            .collect();

        let groups = group_by_leave_type(&records);
        assert_eq!(
            groups,
            vec![
                ("Medical".to_string(), 2),
                ("Other".to_string(), 2),
                ("Personal".to_string(), 1),
            ]
        );
        let total: usize = groups.iter().map(|(_, n)| n).sum();
        assert_eq!(total, records.len());
    }

    #[test]
    fn test_monthly_trend_zero_filled() {
        let now = Utc.with_ymd_and_hms(2025, 2, 15, 0, 0, 0).unwrap();
        let records = vec![
            record("1", LeaveStatus::Pending, at(2025, 2, 1)),
            record("2", LeaveStatus::Pending, at(2025, 2, 10)),
            record("3", LeaveStatus::Pending, at(2024, 12, 5)),
            record("4", LeaveStatus::Pending, at(2024, 6, 5)),
            record("5", LeaveStatus::Pending, None),
        ];

        let trend = monthly_trend_at(&records, 6, now);
        let labels: Vec<&str> = trend.iter().map(|b| b.label.as_str()).collect();
        let counts: Vec<usize> = trend.iter().map(|b| b.count).collect();
        assert_eq!(labels, vec!["Sep 24", "Oct 24", "Nov 24", "Dec 24", "Jan 25", "Feb 25"]);
        assert_eq!(counts, vec![0, 0, 0, 1, 0, 2]);
    }

    #[test]
    fn test_monthly_trend_always_has_requested_length() {
        let now = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
        let empty: Vec<LeaveRecord> = Vec::new();
        assert_eq!(monthly_trend_at(&empty, 6, now).len(), 6);
        assert_eq!(monthly_trend_at(&empty, 12, now).len(), 12);
        assert!(monthly_trend_at(&empty, 0, now).is_empty());
    }

    #[test]
    fn test_monthly_trend_spans_centuries() {
        let now = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
        let records = vec![record("old", LeaveStatus::Approved, at(1950, 1, 20))];

        let trend = monthly_trend_at(&records, 1200, now);
        assert_eq!(trend.len(), 1200);
        assert_eq!((trend[0].year, trend[0].month), (1925, 8));
        assert_eq!((trend[1199].year, trend[1199].month), (2025, 7));
        assert!(trend.windows(2).all(|w| (w[0].year, w[0].month) < (w[1].year, w[1].month)));
        assert_eq!(trend.iter().map(|b| b.count).sum::<usize>(), 1);
    }

    #[test]
    fn test_monthly_trend_uses_reference_time_zone() {
        // 2025-01-31 20:00 UTC is already February in UTC+05:30
        let ist = chrono::FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let now = ist.with_ymd_and_hms(2025, 2, 10, 9, 0, 0).unwrap();
        let records = vec![record(
            "1",
            LeaveStatus::Pending,
            Utc.with_ymd_and_hms(2025, 1, 31, 20, 0, 0).single(),
        )];

        let trend = monthly_trend_at(&records, 2, now);
        assert_eq!(trend[0].count, 0);
        assert_eq!(trend[1].count, 1);
    }

    #[test]
    fn test_views_compose_over_references() {
        let records = vec![
            record("1", LeaveStatus::Pending, at(2025, 1, 2)),
            record("2", LeaveStatus::Approved, at(2025, 1, 3)),
            record("3", LeaveStatus::Pending, at(2025, 1, 4)),
        ];
        let pending = filter_by_status(&records, &StatusFilter::Only(LeaveStatus::Pending));
        let recent = recent_by_timestamp(pending.iter().copied(), 1);
        assert_eq!(prns(&recent), vec!["3"]);
    }
}
