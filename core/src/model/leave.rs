use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LeaveError;
use crate::model::date_range::{compute, DateRange, DaySummary};

pub const FALLBACK_LEAVE_TYPE: &str = "Other";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum LeaveStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    /// Whatever else the sheet holds; kept verbatim.
    Other(String),
}

impl LeaveStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LeaveStatus::Approved | LeaveStatus::Rejected)
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaveStatus::Pending => write!(f, "Pending"),
            LeaveStatus::Approved => write!(f, "Approved"),
            LeaveStatus::Rejected => write!(f, "Rejected"),
            LeaveStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

impl FromStr for LeaveStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.to_lowercase().as_str() {
            "pending" => LeaveStatus::Pending,
            "approved" => LeaveStatus::Approved,
            "rejected" => LeaveStatus::Rejected,
            _ => LeaveStatus::Other(trimmed.to_string()),
        })
    }
}

/// Status selector used by dashboard filters and sections.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(LeaveStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: &LeaveStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

/// Only the three workflow statuses can be filtered on; sheet cells keep the
/// lenient `LeaveStatus` parse.
impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "pending" => Ok(StatusFilter::Only(LeaveStatus::Pending)),
            "approved" => Ok(StatusFilter::Only(LeaveStatus::Approved)),
            "rejected" => Ok(StatusFilter::Only(LeaveStatus::Rejected)),
            _ => Err(format!(
                "Invalid status filter: {} (expected all, pending, approved or rejected)",
                s
            )),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => write!(f, "all"),
            StatusFilter::Only(status) => write!(f, "{}", status),
        }
    }
}

/// Categories offered by the application form.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeaveType {
    Medical,
    Personal,
    #[default]
    Other,
}

impl fmt::Display for LeaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaveType::Medical => write!(f, "Medical"),
            LeaveType::Personal => write!(f, "Personal"),
            LeaveType::Other => write!(f, "Other"),
        }
    }
}

impl FromStr for LeaveType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "medical" | "med" | "sick" => Ok(LeaveType::Medical),
            "personal" | "per" => Ok(LeaveType::Personal),
            "other" => Ok(LeaveType::Other),
            _ => Err(format!("Invalid leave type: {}", s)),
        }
    }
}

/// One submitted leave request plus its review state, as read from the record store.
///
/// Identity is `prn` + `timestamp`; `row` is only the store's locator for updates.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct LeaveRecord {
    pub row: usize,
    pub timestamp: Option<DateTime<Utc>>,
    pub full_name: String,
    pub prn: String,
    pub branch: String,
    pub division: String,
    pub email: String,
    pub contact: String,
    pub leave_type: String,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    /// `Total Days` exactly as the store reported it.
    pub reported_days: Option<u32>,
    pub reason: String,
    pub status: LeaveStatus,
    pub remarks: Option<String>,
}

impl LeaveRecord {
    pub fn date_range(&self) -> Option<DateRange> {
        DateRange::new(self.from_date?, self.to_date?)
    }

    pub fn summary(&self) -> DaySummary {
        compute(self.from_date, self.to_date)
    }

    /// Day count to show: recomputed when the range is usable, otherwise the stored figure.
    pub fn display_days(&self) -> u32 {
        let summary = self.summary();
        if summary.is_empty() {
            self.reported_days.unwrap_or(0)
        } else {
            summary.total_days
        }
    }

    pub fn leave_type_label(&self) -> &str {
        let label = self.leave_type.trim();
        if label.is_empty() {
            FALLBACK_LEAVE_TYPE
        } else {
            label
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == LeaveStatus::Pending
    }

    pub fn same_identity(&self, prn: &str, timestamp: Option<DateTime<Utc>>) -> bool {
        self.prn.trim().eq_ignore_ascii_case(prn.trim()) && self.timestamp == timestamp
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn status(self) -> LeaveStatus {
        match self {
            Decision::Approve => LeaveStatus::Approved,
            Decision::Reject => LeaveStatus::Rejected,
        }
    }
}

impl FromStr for Decision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "approve" | "approved" | "a" => Ok(Decision::Approve),
            "reject" | "rejected" | "r" => Ok(Decision::Reject),
            _ => Err(format!("Invalid decision: {} (expected approve or reject)", s)),
        }
    }
}

/// A review outcome addressed to one row of the record store.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub row: usize,
    pub prn: String,
    pub status: LeaveStatus,
    pub remark: String,
}

impl StatusUpdate {
    /// Only a pending record may be reviewed, and only into a terminal status.
    pub fn for_record(
        record: &LeaveRecord,
        decision: Decision,
        remark: &str,
    ) -> Result<Self, LeaveError> {
        if !record.is_pending() {
            return Err(LeaveError::AlreadyReviewed {
                prn: record.prn.clone(),
                status: record.status.to_string(),
            });
        }

        Ok(Self {
            row: record.row,
            prn: record.prn.clone(),
            status: decision.status(),
            remark: remark.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_record() -> LeaveRecord {
        LeaveRecord {
            row: 5,
            prn: "122B1001".to_string(),
            full_name: "Asha Patil".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_status_parse_is_lenient() {
        assert_eq!("pending".parse::<LeaveStatus>().unwrap(), LeaveStatus::Pending);
        assert_eq!(" APPROVED ".parse::<LeaveStatus>().unwrap(), LeaveStatus::Approved);
        assert_eq!(
            "On Hold".parse::<LeaveStatus>().unwrap(),
            LeaveStatus::Other("On Hold".to_string())
        );
        assert_eq!(LeaveStatus::Other("On Hold".to_string()).to_string(), "On Hold");
    }

    #[test]
    fn test_status_filter() {
        let all: StatusFilter = "all".parse().unwrap();
        let approved: StatusFilter = "Approved".parse().unwrap();
        assert!(all.matches(&LeaveStatus::Rejected));
        assert!(all.matches(&LeaveStatus::Other("x".to_string())));
        assert!(approved.matches(&LeaveStatus::Approved));
        assert!(!approved.matches(&LeaveStatus::Pending));
    }

    #[test]
    fn test_status_filter_rejects_unknown_status() {
        assert_eq!(
            " REJECTED ".parse::<StatusFilter>(),
            Ok(StatusFilter::Only(LeaveStatus::Rejected))
        );
        assert!("pendng".parse::<StatusFilter>().is_err());
        assert!("On Hold".parse::<StatusFilter>().is_err());
        assert!("".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_leave_type_label_fallback() {
        let mut record = pending_record();
        assert_eq!(record.leave_type_label(), "Other");
        record.leave_type = "  ".to_string();
        assert_eq!(record.leave_type_label(), "Other");
        record.leave_type = "Medical".to_string();
        assert_eq!(record.leave_type_label(), "Medical");
    }

    #[test]
    fn test_display_days_prefers_recomputed_range() {
        let mut record = pending_record();
        record.reported_days = Some(9);
        assert_eq!(record.display_days(), 9);

        record.from_date = NaiveDate::from_ymd_opt(2025, 1, 6);
        record.to_date = NaiveDate::from_ymd_opt(2025, 1, 8);
        assert_eq!(record.display_days(), 3);
    }

    #[test]
    fn test_status_update_for_pending_record() {
        let record = pending_record();
        let update = StatusUpdate::for_record(&record, Decision::Approve, " ok ").unwrap();
        assert_eq!(update.row, 5);
        assert_eq!(update.status, LeaveStatus::Approved);
        assert_eq!(update.remark, "ok");
    }

    #[test]
    fn test_status_update_refuses_second_transition() {
        let mut record = pending_record();
        record.status = LeaveStatus::Rejected;
        let err = StatusUpdate::for_record(&record, Decision::Approve, "").unwrap_err();
        assert_eq!(
            err,
            LeaveError::AlreadyReviewed {
                prn: "122B1001".to_string(),
                status: "Rejected".to_string(),
            }
        );
    }

    #[test]
    fn test_decision_parse() {
        assert_eq!("approve".parse::<Decision>().unwrap(), Decision::Approve);
        assert_eq!("R".parse::<Decision>().unwrap(), Decision::Reject);
        assert!("maybe".parse::<Decision>().is_err());
    }
}
