use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Serialize;

use crate::config::{DEFAULT_RECENT_LIMIT, DEFAULT_TREND_MONTHS};
use crate::model::leave::{LeaveRecord, LeaveStatus, StatusFilter};
use crate::service::aggregator::{
    count_by_status, filter_by_status, filter_by_status_and_age_at, group_by_leave_type,
    monthly_trend_at, recent_by_timestamp, search_by_text, MonthBucket, StatusCounts,
};

/// The record tables a reviewer can switch between.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Pending,
    Approved,
    Rejected,
    All,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Pending,
        Section::Approved,
        Section::Rejected,
        Section::All,
    ];

    pub fn status_filter(self) -> StatusFilter {
        match self {
            Section::Pending => StatusFilter::Only(LeaveStatus::Pending),
            Section::Approved => StatusFilter::Only(LeaveStatus::Approved),
            Section::Rejected => StatusFilter::Only(LeaveStatus::Rejected),
            Section::All => StatusFilter::All,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Section::Pending => Section::Approved,
            Section::Approved => Section::Rejected,
            Section::Rejected => Section::All,
            Section::All => Section::Pending,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Pending => write!(f, "Pending"),
            Section::Approved => write!(f, "Approved"),
            Section::Rejected => write!(f, "Rejected"),
            Section::All => write!(f, "All"),
        }
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" | "p" => Ok(Section::Pending),
            "approved" | "a" => Ok(Section::Approved),
            "rejected" | "r" => Ok(Section::Rejected),
            "all" => Ok(Section::All),
            _ => Err(format!("Invalid section: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOptions {
    pub recent_limit: usize,
    pub trend_months: usize,
    /// Applies to the recent table only.
    pub status_filter: StatusFilter,
    /// Applies to the recent table only; `None` keeps records of any age.
    pub max_age_days: Option<i64>,
    pub search: String,
    pub section: Section,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            recent_limit: DEFAULT_RECENT_LIMIT,
            trend_months: DEFAULT_TREND_MONTHS,
            status_filter: StatusFilter::All,
            max_age_days: None,
            search: String::new(),
            section: Section::default(),
        }
    }
}

/// Everything the dashboard shows, derived from one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView<'a> {
    pub counts: StatusCounts,
    pub recent: Vec<&'a LeaveRecord>,
    pub section_rows: Vec<&'a LeaveRecord>,
    pub leave_types: Vec<(String, usize)>,
    pub trend: Vec<MonthBucket>,
}

impl<'a> DashboardView<'a> {
    pub fn build(records: &'a [LeaveRecord], options: &DashboardOptions) -> Self {
        Self::build_at(records, options, Local::now())
    }

    pub fn build_at<Tz: TimeZone>(
        records: &'a [LeaveRecord],
        options: &DashboardOptions,
        now: DateTime<Tz>,
    ) -> Self {
        let filtered = match options.max_age_days {
            Some(days) => filter_by_status_and_age_at(
                records,
                &options.status_filter,
                days,
                now.with_timezone(&Utc),
            ),
            None => filter_by_status(records, &options.status_filter),
        };

        Self {
            counts: count_by_status(records),
            recent: recent_by_timestamp(filtered, options.recent_limit),
            section_rows: Self::section(records, options.section, &options.search),
            leave_types: group_by_leave_type(records),
            trend: monthly_trend_at(records, options.trend_months, now),
        }
    }

    /// Rows of one section in snapshot order, narrowed by a free text query.
    pub fn section(records: &'a [LeaveRecord], section: Section, query: &str) -> Vec<&'a LeaveRecord> {
        search_by_text(filter_by_status(records, &section.status_filter()), query)
    }
}
