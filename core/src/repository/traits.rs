use crate::model::leave::{LeaveRecord, StatusUpdate};
use crate::service::dto::SubmissionPayload;
use anyhow::Result;

/// The external record store. It is the only source of truth; nothing is cached.
pub trait LeaveRepository {
    fn list(&self) -> Result<Vec<LeaveRecord>>;
    fn submit(&self, submission: &SubmissionPayload) -> Result<()>;
    fn update_status(&self, update: &StatusUpdate) -> Result<()>;
}

impl<R: LeaveRepository + ?Sized> LeaveRepository for Box<R> {
    fn list(&self) -> Result<Vec<LeaveRecord>> {
        (**self).list()
    }

    fn submit(&self, submission: &SubmissionPayload) -> Result<()> {
        (**self).submit(submission)
    }

    fn update_status(&self, update: &StatusUpdate) -> Result<()> {
        (**self).update_status(update)
    }
}
