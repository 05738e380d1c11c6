use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::LeaveError;
use crate::model::leave::{LeaveRecord, StatusUpdate};
use crate::repository::traits::LeaveRepository;
use crate::service::dto::{records_from_json, SubmissionPayload};

/// Record store behind the spreadsheet web app.
///
/// - `GET  {url}?action=getLeaves&teacher=..` returns the rows as a JSON array
/// - `POST {url}` with a [`SubmissionPayload`] appends a row
/// - `GET  {url}?action=updateStatus&row=..&status=..&remark=..` reviews a row
pub struct SheetRepository {
    client: Client,
    url: Url,
    teacher: String,
}

impl SheetRepository {
    pub fn new(script_url: &str, teacher: &str, timeout: Duration) -> Result<Self> {
        let url = Url::parse(script_url)
            .with_context(|| format!("invalid script URL: {}", script_url))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("could not build HTTP client")?;

        Ok(Self {
            client,
            url,
            teacher: teacher.to_string(),
        })
    }

    pub fn list_url(&self) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair("action", "getLeaves")
            .append_pair("teacher", &self.teacher);
        url
    }

    pub fn update_url(&self, update: &StatusUpdate) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair("action", "updateStatus")
            .append_pair("row", &update.row.to_string())
            .append_pair("status", &update.status.to_string())
            .append_pair("remark", &update.remark);
        url
    }
}

impl LeaveRepository for SheetRepository {
    fn list(&self) -> Result<Vec<LeaveRecord>> {
        let url = self.list_url();
        debug!(%url, "fetching leave snapshot");

        let payload: Value = self
            .client
            .get(url)
            .send()
            .context("failed to reach the record store")?
            .error_for_status()
            .context("record store refused the snapshot request")?
            .json()
            .context("record store answered with invalid JSON")?;

        let records = records_from_json(payload);
        info!(count = records.len(), teacher = %self.teacher, "loaded leave snapshot");
        Ok(records)
    }

    fn submit(&self, submission: &SubmissionPayload) -> Result<()> {
        // Fire-and-forget: the web app does not report a useful status for appends.
        let response = self
            .client
            .post(self.url.clone())
            .json(submission)
            .send()
            .context("failed to submit leave application")?;

        if !response.status().is_success() {
            warn!(status = %response.status(), prn = %submission.prn, "submission answered with a non-success status");
        }
        info!(prn = %submission.prn, "leave application sent");
        Ok(())
    }

    fn update_status(&self, update: &StatusUpdate) -> Result<()> {
        let response = self
            .client
            .get(self.update_url(update))
            .send()
            .context("failed to reach the record store")?;

        let status = response.status();
        if !status.is_success() {
            return Err(LeaveError::Rejected(format!("status update answered {}", status)).into());
        }

        info!(row = update.row, prn = %update.prn, status = %update.status, "leave status updated");
        Ok(())
    }
}
