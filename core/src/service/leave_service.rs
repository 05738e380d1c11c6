use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use tracing::{info, warn};

use crate::error::LeaveError;
use crate::model::application::LeaveApplication;
use crate::model::date_range::DaySummary;
use crate::model::leave::{Decision, LeaveRecord, StatusUpdate};
use crate::repository::LeaveRepository;
use crate::service::aggregator::recent_by_timestamp;
use crate::service::dto::SubmissionPayload;

pub struct LeaveService<R: LeaveRepository> {
    repo: R,
}

impl<R: LeaveRepository> LeaveService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// A fresh copy of every record. Nothing is cached between calls.
    pub fn snapshot(&self) -> Result<Vec<LeaveRecord>> {
        self.repo.list()
    }

    /// Validates against the local calendar day of `now` and sends the application
    /// as a pending record.
    pub fn submit(&self, application: &LeaveApplication, now: DateTime<Utc>) -> Result<DaySummary> {
        let today = now.with_timezone(&Local).date_naive();
        let summary = application.validate(today)?;

        let payload = SubmissionPayload::new(application, summary, now);
        self.repo.submit(&payload)?;

        info!(
            prn = %payload.prn,
            total_days = summary.total_days,
            working_days = summary.working_days,
            "leave application submitted"
        );
        Ok(summary)
    }

    /// Approves or rejects one pending record.
    ///
    /// Without a timestamp the PRN must single out one pending record. The record is
    /// looked up again right before the update; a record reviewed in the meantime is
    /// refused, but two reviewers racing on the same row can still both write.
    pub fn review(
        &self,
        prn: &str,
        timestamp: Option<DateTime<Utc>>,
        decision: Decision,
        remark: &str,
    ) -> Result<StatusUpdate> {
        let snapshot = self.repo.list()?;
        let record = locate(&snapshot, prn, timestamp)?;

        let update = StatusUpdate::for_record(record, decision, remark)?;
        self.repo.update_status(&update)?;

        info!(row = update.row, prn = %update.prn, status = %update.status, "leave reviewed");
        Ok(update)
    }
}

/// Finds the record a reviewer means by PRN and, optionally, submission time.
pub fn locate<'a>(
    records: &'a [LeaveRecord],
    prn: &str,
    timestamp: Option<DateTime<Utc>>,
) -> Result<&'a LeaveRecord, LeaveError> {
    let matches: Vec<&LeaveRecord> = records
        .iter()
        .filter(|r| match timestamp {
            Some(_) => r.same_identity(prn, timestamp),
            None => r.prn.trim().eq_ignore_ascii_case(prn.trim()),
        })
        .collect();

    match matches.as_slice() {
        [] => Err(LeaveError::NotFound(prn.trim().to_string())),
        [only] => Ok(*only),
        _ => {
            let pending: Vec<&LeaveRecord> =
                matches.iter().copied().filter(|r| r.is_pending()).collect();
            match pending.as_slice() {
                [only] => Ok(*only),
                // Nothing left to review; report the latest so the caller sees its status.
                [] => match recent_by_timestamp(matches.iter().copied(), 1).first() {
                    Some(newest) => Ok(*newest),
                    None => Err(LeaveError::NotFound(prn.trim().to_string())),
                },
                many => {
                    warn!(prn, count = many.len(), "review target is ambiguous");
                    Err(LeaveError::Ambiguous {
                        prn: prn.trim().to_string(),
                        count: many.len(),
                    })
                }
            }
        }
    }
}
