use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::time::parse_calendar_date;

/// Day counts for a leave period. The all-zero value means "no valid range yet".
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DaySummary {
    pub total_days: u32,
    pub working_days: u32,
}

impl DaySummary {
    pub fn is_empty(&self) -> bool {
        self.total_days == 0
    }

    /// Form wording, e.g. `3 days (2 working days)`.
    pub fn describe(&self) -> String {
        let plural = if self.total_days == 1 { "" } else { "s" };
        format!(
            "{} day{} ({} working days)",
            self.total_days, plural, self.working_days
        )
    }
}

/// An inclusive, validated calendar range: `start <= end` always holds.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    pub fn summary(&self) -> DaySummary {
        let total_days = (self.end - self.start).num_days() as u32 + 1;
        let working_days = self.days().filter(|d| is_working_day(*d)).count() as u32;
        DaySummary {
            total_days,
            working_days,
        }
    }
}

/// Monday through Friday.
pub fn is_working_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn compute(start: Option<NaiveDate>, end: Option<NaiveDate>) -> DaySummary {
    match (start, end) {
        (Some(start), Some(end)) => DateRange::new(start, end)
            .map(|range| range.summary())
            .unwrap_or_default(),
        _ => DaySummary::default(),
    }
}

/// Same as [`compute`] for raw form input; an unparseable side counts as missing.
pub fn compute_str(start: &str, end: &str) -> DaySummary {
    compute(parse_calendar_date(start), parse_calendar_date(end))
}
