use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;

use crate::model::application::LeaveApplication;
use crate::model::leave::LeaveType;
use crate::time::parse_human_date;

/// Keys accepted on the command line when filling in an application.
pub const APPLICATION_KEYS: &[&str] = &[
    "year",
    "semester",
    "prn",
    "name",
    "division",
    "branch",
    "email",
    "contact",
    "teacher",
    "associate",
    "type",
    "from",
    "to",
    "reason",
];

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub text: String,
    pub metadata: HashMap<String, String>,
}

/// Splits `key:value` tokens from free text. Later duplicates win.
pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut text_parts = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            // "2:fri" style values only make sense after a key, so digits never start one.
            if !key.is_empty() && !key.starts_with(|c: char| c.is_ascii_digit()) {
                metadata.insert(key.to_lowercase(), value.to_string());
                continue;
            }
        }
        text_parts.push(arg.as_str());
    }

    ParsedInput {
        text: text_parts.join(" "),
        metadata,
    }
}

pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    // 1. Exact match
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    // 2. Prefix match
    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}

/// Fills `base` from command line tokens. Free text becomes the reason unless
/// `reason:` is given; dates accept anything `parse_human_date` does.
pub fn build_application(
    args: &[String],
    base: LeaveApplication,
    today: NaiveDate,
) -> Result<LeaveApplication> {
    let parsed = parse_args(args);
    let mut application = base;

    if !parsed.text.trim().is_empty() {
        application.reason = parsed.text.trim().to_string();
    }

    let mut pairs: Vec<(String, String)> = parsed.metadata.into_iter().collect();
    pairs.sort();

    for (raw_key, value) in pairs {
        let key = expand_key(&raw_key, APPLICATION_KEYS)?;
        let value = value.trim().to_string();
        match key.as_str() {
            "year" => application.academic_year = value,
            "semester" => application.semester = value,
            "prn" => application.prn = value,
            "name" => application.full_name = value,
            "division" => application.division = value,
            "branch" => application.branch = value,
            "email" => application.email = value,
            "contact" => application.contact = value,
            "teacher" => application.class_teacher = value,
            "associate" => {
                application.associate_teacher = (!value.is_empty()).then_some(value)
            }
            "type" => {
                application.leave_type = value.parse::<LeaveType>().map_err(|e| anyhow!(e))?
            }
            "from" => {
                application.from_date = Some(
                    parse_human_date(&value, today)
                        .with_context(|| format!("Invalid from date: {}", value))?,
                )
            }
            "to" => {
                application.to_date = Some(
                    parse_human_date(&value, today)
                        .with_context(|| format!("Invalid to date: {}", value))?,
                )
            }
            "reason" => application.reason = value,
            _ => return Err(anyhow!("Unhandled key: {}", key)),
        }
    }

    Ok(application)
}
