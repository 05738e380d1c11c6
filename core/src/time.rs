use anyhow::{anyhow, Result};
use chrono::{
    DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc, Weekday,
};

/// Parses a submission timestamp as the record store hands it back.
///
/// Accepts RFC 3339, naive ISO date-times (read as UTC), `YYYY-MM-DD HH:MM:SS`,
/// the sheet's US style `M/D/YYYY H:MM:SS` and bare dates (midnight UTC).
/// Anything else yields `None`; callers treat that as "no timestamp".
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
    ];
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, fmt) {
            return Some(Utc.from_utc_datetime(&dt));
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Utc.from_utc_datetime(&dt))
}

/// Parses a leave date. Date-times are converted to the local calendar day,
/// the time of day is dropped.
pub fn parse_calendar_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(d) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Local).date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(input, "%d-%m-%Y").ok()
}

/// Resolves the shorthand accepted by `from:` and `to:` on the command line.
pub fn parse_human_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let lowered = input.trim().to_lowercase();

    // 1. Reserved keywords
    match lowered.as_str() {
        "today" | "tod" => return Ok(today),
        "tomorrow" | "tom" => return offset(today, Duration::try_days(1), input),
        _ => {}
    }

    // 2. Relative format (+Nd, +Nw)
    if let Some(rest) = lowered.strip_prefix('+') {
        if rest.len() < 2 {
            return Err(anyhow!("Invalid relative format: {}", input));
        }
        let (num_str, unit) = rest.split_at(rest.len() - 1);
        let count: i64 = num_str
            .parse()
            .map_err(|_| anyhow!("Invalid relative format: {}", input))?;

        return match unit {
            "d" => offset(today, Duration::try_days(count), input),
            "w" => offset(today, Duration::try_weeks(count), input),
            _ => Err(anyhow!("Unknown unit in relative date: {}", unit)),
        };
    }

    // 3. Fixed formats
    if let Some(d) = parse_calendar_date(&lowered) {
        return Ok(d);
    }

    // 4. Weekday format (fri, 2:fri)
    if let Some((count, day_str)) = parse_weekday_token(&lowered) {
        if let Ok(target_weekday) = parse_weekday_str(day_str) {
            let mut days_needed = target_weekday.num_days_from_sunday() as i64
                - today.weekday().num_days_from_sunday() as i64;
            if days_needed <= 0 {
                days_needed += 7;
            }
            // count = 1 is the next occurrence, every extra count is one more week.
            let days = (count - 1)
                .checked_mul(7)
                .and_then(|weeks| weeks.checked_add(days_needed));
            return offset(today, days.and_then(Duration::try_days), input);
        }
    }

    Err(anyhow!("Could not parse date: {}", input))
}

fn offset(today: NaiveDate, step: Option<Duration>, input: &str) -> Result<NaiveDate> {
    step.and_then(|step| today.checked_add_signed(step))
        .ok_or_else(|| anyhow!("Date out of range: {}", input))
}

/// Short chart label for a calendar month, e.g. `Jan 25`.
pub fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%b %y").to_string())
        .unwrap_or_default()
}

/// Moves `(year, month)` by `delta` months in either direction. Years past the
/// `i32` range saturate.
pub fn shift_month(year: i32, month: u32, delta: i64) -> (i32, u32) {
    let index = (i64::from(year) * 12 + i64::from(month) - 1).saturating_add(delta);
    let year = index.div_euclid(12).clamp(i64::from(i32::MIN), i64::from(i32::MAX));
    (year as i32, index.rem_euclid(12) as u32 + 1)
}

pub fn format_display_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

fn parse_weekday_token(input: &str) -> Option<(i64, &str)> {
    match input.split_once(':') {
        Some((count, day)) => count.parse::<i64>().ok().filter(|c| *c > 0).map(|c| (c, day)),
        None => Some((1, input)),
    }
}

fn parse_weekday_str(s: &str) -> Result<Weekday> {
    match s {
        "mon" | "monday" => Ok(Weekday::Mon),
        "tue" | "tuesday" => Ok(Weekday::Tue),
        "wed" | "wednesday" => Ok(Weekday::Wed),
        "thu" | "thursday" => Ok(Weekday::Thu),
        "fri" | "friday" => Ok(Weekday::Fri),
        "sat" | "saturday" => Ok(Weekday::Sat),
        "sun" | "sunday" => Ok(Weekday::Sun),
        _ => Err(anyhow!("Invalid weekday")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 1, 6, 10, 15, 30).unwrap();
        assert_eq!(parse_timestamp("2025-01-06T10:15:30.000Z"), Some(expected));
        assert_eq!(parse_timestamp("2025-01-06T15:45:30+05:30"), Some(expected));
        assert_eq!(parse_timestamp("2025-01-06 10:15:30"), Some(expected));
        assert_eq!(parse_timestamp("1/6/2025 10:15:30"), Some(expected));
        assert_eq!(
            parse_timestamp("2025-01-06"),
            Some(Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("   "), None);
        assert_eq!(parse_timestamp("yesterday-ish"), None);
        assert_eq!(parse_timestamp("2025-13-45"), None);
    }

    #[test]
    fn test_parse_calendar_date() {
        assert_eq!(parse_calendar_date("2025-01-06"), Some(date(2025, 1, 6)));
        assert_eq!(parse_calendar_date("06-01-2025"), Some(date(2025, 1, 6)));
        assert_eq!(parse_calendar_date("2025-01-06T00:00:00"), Some(date(2025, 1, 6)));
        assert_eq!(parse_calendar_date("n/a"), None);
    }

    #[test]
    fn test_parse_human_date() {
        // 2025-01-08 is a Wednesday
        let today = date(2025, 1, 8);
        assert_eq!(parse_human_date("today", today).unwrap(), today);
        assert_eq!(parse_human_date("tom", today).unwrap(), date(2025, 1, 9));
        assert_eq!(parse_human_date("+3d", today).unwrap(), date(2025, 1, 11));
        assert_eq!(parse_human_date("+2w", today).unwrap(), date(2025, 1, 22));
        assert_eq!(parse_human_date("fri", today).unwrap(), date(2025, 1, 10));
        assert_eq!(parse_human_date("wed", today).unwrap(), date(2025, 1, 15));
        assert_eq!(parse_human_date("2:mon", today).unwrap(), date(2025, 1, 20));
        assert_eq!(parse_human_date("2025-02-01", today).unwrap(), date(2025, 2, 1));
        assert!(parse_human_date("+d", today).is_err());
        assert!(parse_human_date("someday", today).is_err());
    }

    #[test]
    fn test_parse_human_date_out_of_range() {
        let today = date(2025, 1, 8);
        assert!(parse_human_date("+999999999d", today).is_err());
        assert!(parse_human_date("+99999999999999w", today).is_err());
        assert!(parse_human_date("+9223372036854775807d", today).is_err());
        assert!(parse_human_date("9223372036854775807:fri", today).is_err());
        assert!(parse_human_date("99999999:fri", today).is_err());
        assert_eq!(parse_human_date("+3650d", today).unwrap(), date(2035, 1, 6));
    }

    #[test]
    fn test_parse_weekday_token() {
        assert_eq!(parse_weekday_token("fri"), Some((1, "fri")));
        assert_eq!(parse_weekday_token("2:fri"), Some((2, "fri")));
        assert_eq!(parse_weekday_token("x:fri"), None);
    }

    #[test]
    fn test_shift_month_crosses_years() {
        assert_eq!(shift_month(2025, 1, -1), (2024, 12));
        assert_eq!(shift_month(2025, 3, -5), (2024, 10));
        assert_eq!(shift_month(2024, 12, 1), (2025, 1));
        assert_eq!(shift_month(2025, 6, 0), (2025, 6));
    }

    #[test]
    fn test_shift_month_saturates_far_offsets() {
        assert_eq!(shift_month(2025, 3, -1200), (1925, 3));
        assert_eq!(shift_month(2025, 3, i64::MIN).0, i32::MIN);
        assert_eq!(shift_month(2025, 3, i64::MAX).0, i32::MAX);
    }

    #[test]
    fn test_month_label() {
        assert_eq!(month_label(2025, 1), "Jan 25");
        assert_eq!(month_label(2024, 12), "Dec 24");
    }

    #[test]
    fn test_format_display_date() {
        assert_eq!(format_display_date(Some(date(2025, 1, 6))), "06/01/2025");
        assert_eq!(format_display_date(None), "N/A");
    }
}
