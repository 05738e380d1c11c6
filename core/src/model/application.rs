use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::LeaveError;
use crate::model::date_range::{compute, DaySummary};
use crate::model::leave::LeaveType;

/// A student's leave application as entered on the form, before submission.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct LeaveApplication {
    pub academic_year: String,
    pub semester: String,
    pub prn: String,
    pub full_name: String,
    pub division: String,
    pub branch: String,
    pub email: String,
    pub contact: String,
    pub class_teacher: String,
    pub associate_teacher: Option<String>,
    pub leave_type: LeaveType,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub reason: String,
}

impl LeaveApplication {
    pub fn summary(&self) -> DaySummary {
        compute(self.from_date, self.to_date)
    }

    /// Checks the form rules and returns the summary that goes out with the submission.
    pub fn validate(&self, today: NaiveDate) -> Result<DaySummary, LeaveError> {
        let required = [
            ("academic year", &self.academic_year),
            ("semester", &self.semester),
            ("PRN", &self.prn),
            ("full name", &self.full_name),
            ("division", &self.division),
            ("branch", &self.branch),
            ("email", &self.email),
            ("contact", &self.contact),
            ("class teacher", &self.class_teacher),
            ("reason", &self.reason),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(LeaveError::MissingField { field });
            }
        }

        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
            _ => return Err(LeaveError::InvalidEmail(email.to_string())),
        }

        let from = self.from_date.ok_or(LeaveError::MissingField { field: "from date" })?;
        let to = self.to_date.ok_or(LeaveError::MissingField { field: "to date" })?;

        if from < today {
            return Err(LeaveError::StartsInPast {
                from: from.to_string(),
                today: today.to_string(),
            });
        }
        if to < from {
            return Err(LeaveError::InvalidRange {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        Ok(self.summary())
    }
}
