use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum LeaveError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("invalid email address: '{0}'")]
    InvalidEmail(String),

    #[error("leave cannot start in the past ({from} is before {today})")]
    StartsInPast { from: String, today: String },

    #[error("to date {to} is before from date {from}")]
    InvalidRange { from: String, to: String },

    #[error("no leave record found for PRN {0}")]
    NotFound(String),

    #[error("PRN {prn} matches {count} leave records; pass a timestamp to pick one")]
    Ambiguous { prn: String, count: usize },

    #[error("leave for PRN {prn} was already reviewed ({status})")]
    AlreadyReviewed { prn: String, status: String },

    #[error("record store rejected the request: {0}")]
    Rejected(String),
}
