use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use dotenvy::dotenv;

pub const DEFAULT_TEACHER: &str = "Prof. Dinesh Kute";
pub const DEFAULT_ACADEMIC_YEAR: &str = "2025-2026";
pub const DEFAULT_RECENT_LIMIT: usize = 10;
pub const DEFAULT_TREND_MONTHS: usize = 6;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Settings read from the environment (and a `.env` file, if present).
///
/// - `LEAVEDESK_SCRIPT_URL`: spreadsheet web app; unset means the offline file store
/// - `LEAVEDESK_TEACHER`: whose leaves the dashboard shows
/// - `LEAVEDESK_ACADEMIC_YEAR`: default for new applications
/// - `LEAVEDESK_RECENT_LIMIT`, `LEAVEDESK_TREND_MONTHS`: dashboard sizes
/// - `LEAVEDESK_HTTP_TIMEOUT_SECS`: request timeout for the web app
/// - `LEAVEDESK_DATA_DIR`: snapshot and log directory (default `~/.leavedesk`)
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub script_url: Option<String>,
    pub teacher: String,
    pub academic_year: String,
    pub recent_limit: usize,
    pub trend_months: usize,
    pub http_timeout: Duration,
    pub data_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let data_dir = match get("LEAVEDESK_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::home_dir()
                .ok_or_else(|| anyhow!("Could not determine home directory"))?
                .join(".leavedesk"),
        };

        let recent_limit = parse_or(get("LEAVEDESK_RECENT_LIMIT"), "LEAVEDESK_RECENT_LIMIT", DEFAULT_RECENT_LIMIT)?;
        let trend_months = parse_or(get("LEAVEDESK_TREND_MONTHS"), "LEAVEDESK_TREND_MONTHS", DEFAULT_TREND_MONTHS)?;
        let timeout_secs = parse_or(
            get("LEAVEDESK_HTTP_TIMEOUT_SECS"),
            "LEAVEDESK_HTTP_TIMEOUT_SECS",
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?;

        Ok(Self {
            script_url: get("LEAVEDESK_SCRIPT_URL"),
            teacher: get("LEAVEDESK_TEACHER").unwrap_or_else(|| DEFAULT_TEACHER.to_string()),
            academic_year: get("LEAVEDESK_ACADEMIC_YEAR")
                .unwrap_or_else(|| DEFAULT_ACADEMIC_YEAR.to_string()),
            recent_limit,
            trend_months,
            http_timeout: Duration::from_secs(timeout_secs),
            data_dir,
        })
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{} must be a number, got '{}'", key, raw)),
        None => Ok(default),
    }
}
