use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::model::application::LeaveApplication;
use crate::model::date_range::DaySummary;
use crate::model::leave::{LeaveRecord, LeaveStatus};
use crate::time::{parse_calendar_date, parse_timestamp};

/// Sheet data starts below the header row, and sheet rows are 1-based.
pub const FIRST_DATA_ROW: usize = 2;

/// One spreadsheet row as the record store serves it. Every cell is optional and
/// may hold any scalar; the sheet enforces no schema.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SheetRow {
    #[serde(rename = "Timestamp", default, deserialize_with = "lenient_cell")]
    pub timestamp: Option<String>,
    #[serde(rename = "Full Name", default, deserialize_with = "lenient_cell")]
    pub full_name: Option<String>,
    #[serde(rename = "PRN", default, deserialize_with = "lenient_cell")]
    pub prn: Option<String>,
    #[serde(rename = "Branch", default, deserialize_with = "lenient_cell")]
    pub branch: Option<String>,
    #[serde(rename = "Division", default, deserialize_with = "lenient_cell")]
    pub division: Option<String>,
    #[serde(rename = "Email", default, deserialize_with = "lenient_cell")]
    pub email: Option<String>,
    #[serde(rename = "Contact", default, deserialize_with = "lenient_cell")]
    pub contact: Option<String>,
    #[serde(rename = "Type of Leave", default, deserialize_with = "lenient_cell")]
    pub leave_type: Option<String>,
    #[serde(rename = "From Date", default, deserialize_with = "lenient_cell")]
    pub from_date: Option<String>,
    #[serde(rename = "To Date", default, deserialize_with = "lenient_cell")]
    pub to_date: Option<String>,
    #[serde(rename = "Total Days", default, deserialize_with = "lenient_cell")]
    pub total_days: Option<String>,
    #[serde(rename = "Reason for Leave", default, deserialize_with = "lenient_cell")]
    pub reason: Option<String>,
    #[serde(rename = "Status", default, deserialize_with = "lenient_cell")]
    pub status: Option<String>,
    #[serde(rename = "Remarks", default, deserialize_with = "lenient_cell")]
    pub remarks: Option<String>,
    #[serde(rename = "Academic Year", default, deserialize_with = "lenient_cell", skip_serializing_if = "Option::is_none")]
    pub academic_year: Option<String>,
    #[serde(rename = "Semester", default, deserialize_with = "lenient_cell", skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
    #[serde(rename = "Class Teacher", default, deserialize_with = "lenient_cell", skip_serializing_if = "Option::is_none")]
    pub class_teacher: Option<String>,
    #[serde(rename = "Associate Teacher", default, deserialize_with = "lenient_cell", skip_serializing_if = "Option::is_none")]
    pub associate_teacher: Option<String>,
    #[serde(rename = "Working Days", default, deserialize_with = "lenient_cell", skip_serializing_if = "Option::is_none")]
    pub working_days: Option<String>,
}

fn lenient_cell<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(cell_text))
}

pub(crate) fn cell_text(value: Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_day_count(text: &str) -> Option<u32> {
    // Sheets hands back "3", 3, 3.0 or "3 days"
    let number = text.split_whitespace().next()?;
    number
        .parse::<u32>()
        .ok()
        .or_else(|| number.parse::<f64>().ok().filter(|v| *v >= 0.0).map(|v| v as u32))
}

impl LeaveRecord {
    /// Maps a sheet row into the typed record. Never fails: unreadable cells become
    /// empty or `None`, and a row without a status is still pending.
    pub fn from_row(index: usize, row: SheetRow) -> Self {
        let timestamp = row.timestamp.as_deref().and_then(parse_timestamp);
        if timestamp.is_none() {
            debug!(index, raw = ?row.timestamp, "leave row has no usable timestamp");
        }

        Self {
            row: index + FIRST_DATA_ROW,
            timestamp,
            full_name: row.full_name.unwrap_or_default(),
            prn: row.prn.unwrap_or_default(),
            branch: row.branch.unwrap_or_default(),
            division: row.division.unwrap_or_default(),
            email: row.email.unwrap_or_default(),
            contact: row.contact.unwrap_or_default(),
            leave_type: row.leave_type.unwrap_or_default(),
            from_date: row.from_date.as_deref().and_then(parse_calendar_date),
            to_date: row.to_date.as_deref().and_then(parse_calendar_date),
            reported_days: row.total_days.as_deref().and_then(parse_day_count),
            reason: row.reason.unwrap_or_default(),
            status: row
                .status
                .map(|s| s.parse::<LeaveStatus>().unwrap_or_default())
                .unwrap_or_default(),
            remarks: row.remarks,
        }
    }
}

/// Converts whatever the record store returned into a snapshot. Elements that are
/// not objects are skipped; a non-array payload is an empty snapshot.
pub fn records_from_json(payload: Value) -> Vec<LeaveRecord> {
    let items = match payload {
        Value::Array(items) => items,
        other => {
            warn!(kind = json_kind(&other), "record store did not return an array");
            return Vec::new();
        }
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<SheetRow>(item) {
            Ok(row) => Some(LeaveRecord::from_row(index, row)),
            Err(e) => {
                warn!(index, error = %e, "skipping unreadable leave row");
                None
            }
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The JSON body the application form posts to the record store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub timestamp: String,
    pub academic_year: String,
    pub semester: String,
    pub prn: String,
    pub full_name: String,
    pub division: String,
    pub branch: String,
    pub email: String,
    pub contact: String,
    pub class_teacher: String,
    pub associate_teacher: String,
    pub leave_type: String,
    pub from_date: String,
    pub to_date: String,
    pub total_days: u32,
    pub working_days: u32,
    pub reason: String,
    pub status: String,
}

impl SubmissionPayload {
    pub fn new(application: &LeaveApplication, summary: DaySummary, now: DateTime<Utc>) -> Self {
        let date_text = |d: Option<chrono::NaiveDate>| {
            d.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
        };

        Self {
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            academic_year: application.academic_year.trim().to_string(),
            semester: application.semester.trim().to_string(),
            prn: application.prn.trim().to_string(),
            full_name: application.full_name.trim().to_string(),
            division: application.division.trim().to_string(),
            branch: application.branch.trim().to_string(),
            email: application.email.trim().to_string(),
            contact: application.contact.trim().to_string(),
            class_teacher: application.class_teacher.trim().to_string(),
            associate_teacher: application
                .associate_teacher
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            leave_type: application.leave_type.to_string(),
            from_date: date_text(application.from_date),
            to_date: date_text(application.to_date),
            total_days: summary.total_days,
            working_days: summary.working_days,
            reason: application.reason.trim().to_string(),
            status: LeaveStatus::Pending.to_string(),
        }
    }

    /// The same submission in the store's row shape, for stores that keep rows locally.
    pub fn to_sheet_row(&self) -> SheetRow {
        let cell = |s: &str| (!s.trim().is_empty()).then(|| s.to_string());
        SheetRow {
            timestamp: cell(&self.timestamp),
            full_name: cell(&self.full_name),
            prn: cell(&self.prn),
            branch: cell(&self.branch),
            division: cell(&self.division),
            email: cell(&self.email),
            contact: cell(&self.contact),
            leave_type: cell(&self.leave_type),
            from_date: cell(&self.from_date),
            to_date: cell(&self.to_date),
            total_days: Some(self.total_days.to_string()),
            reason: cell(&self.reason),
            status: cell(&self.status),
            remarks: None,
            academic_year: cell(&self.academic_year),
            semester: cell(&self.semester),
            class_teacher: cell(&self.class_teacher),
            associate_teacher: cell(&self.associate_teacher),
            working_days: Some(self.working_days.to_string()),
        }
    }
}
