use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::LeaveError;
use crate::model::leave::{LeaveRecord, StatusUpdate};
use crate::repository::traits::LeaveRepository;
use crate::service::dto::{cell_text, records_from_json, SubmissionPayload, FIRST_DATA_ROW};

const DEFAULT_FILE_NAME: &str = "leaves.json";

/// Offline record store: a JSON array of sheet-shaped rows in the data directory.
/// Rows are kept as raw JSON so columns and elements this crate does not read
/// survive every write.
#[derive(Clone)]
pub struct FileLeaveRepository {
    file_path: PathBuf,
}

impl FileLeaveRepository {
    pub fn new(base_dir: &Path) -> Result<Self> {
        fs::create_dir_all(base_dir)
            .with_context(|| format!("could not create {}", base_dir.display()))?;
        let path = base_dir.join(DEFAULT_FILE_NAME);

        // Start from an empty sheet
        if !path.exists() {
            let mut writer = BufWriter::new(File::create(&path)?);
            serde_json::to_writer_pretty(&mut writer, &Vec::<Value>::new())?;
            writer.flush()?;
            info!(path = %path.display(), "created empty leave snapshot");
        }

        Ok(FileLeaveRepository { file_path: path })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn read_raw(&self) -> Result<Value> {
        let file = File::open(&self.file_path)
            .with_context(|| format!("could not open {}", self.file_path.display()))?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    fn read_rows(&self) -> Result<Vec<Value>> {
        match self.read_raw()? {
            Value::Array(items) => Ok(items),
            _ => Err(anyhow!(
                "{} does not hold a list of rows",
                self.file_path.display()
            )),
        }
    }

    fn write_rows(&self, rows: &[Value]) -> Result<()> {
        let file = File::create(&self.file_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, rows)?;
        writer.flush()?;
        Ok(())
    }
}

impl LeaveRepository for FileLeaveRepository {
    fn list(&self) -> Result<Vec<LeaveRecord>> {
        let records = records_from_json(self.read_raw()?);
        debug!(count = records.len(), "loaded leave snapshot from file");
        Ok(records)
    }

    fn submit(&self, submission: &SubmissionPayload) -> Result<()> {
        let mut rows = self.read_rows()?;
        rows.push(serde_json::to_value(submission.to_sheet_row())?);
        self.write_rows(&rows)
    }

    fn update_status(&self, update: &StatusUpdate) -> Result<()> {
        let mut rows = self.read_rows()?;
        let row = update
            .row
            .checked_sub(FIRST_DATA_ROW)
            .and_then(|index| rows.get_mut(index))
            .and_then(Value::as_object_mut)
            .ok_or_else(|| LeaveError::NotFound(update.prn.clone()))?;

        // The locator must still point at the same student.
        let prn = row.get("PRN").cloned().and_then(cell_text);
        if prn.as_deref() != Some(update.prn.trim()) {
            return Err(LeaveError::NotFound(update.prn.clone()).into());
        }

        row.insert("Status".to_string(), Value::String(update.status.to_string()));
        let remarks = match update.remark.as_str() {
            "" => Value::Null,
            remark => Value::String(remark.to_string()),
        };
        row.insert("Remarks".to_string(), remarks);
        self.write_rows(&rows)
    }
}
