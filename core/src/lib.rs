pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;
pub mod usecase;

pub use config::AppConfig;
pub use error::LeaveError;
pub use input::{build_application, expand_key, parse_args, ParsedInput};
pub use model::application::LeaveApplication;
pub use model::date_range::{compute, compute_str, is_working_day, DateRange, DaySummary};
pub use model::leave::{Decision, LeaveRecord, LeaveStatus, LeaveType, StatusFilter, StatusUpdate};
pub use repository::{FileLeaveRepository, LeaveRepository, SheetRepository};
pub use service::aggregator::{MonthBucket, StatusCounts};
pub use service::leave_service::LeaveService;
pub use time::{format_display_date, parse_human_date};
pub use usecase::dashboard::{DashboardOptions, DashboardView, Section};
