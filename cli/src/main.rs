mod logging;
mod preview;
mod stats;
mod table;
mod tui;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Local, Utc};
use clap::Parser;
use leavedesk_core::time::parse_timestamp;
use leavedesk_core::{
    build_application, compute, parse_human_date, AppConfig, DashboardOptions, DashboardView,
    Decision, FileLeaveRepository, LeaveApplication, LeaveRepository, LeaveService,
    SheetRepository, StatusFilter, Section,
};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "leavedesk")]
#[command(about = "Student leave applications and the teacher's review dashboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Count calendar and working days in a leave period (usage: days tom +1w)
    Days { from: String, to: String },
    /// Submit a leave application (usage: submit Fever prn:122B1001 name:"Asha Patil" from:tom to:fri ...)
    Submit {
        /// Reason text plus application fields (key:value)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Show an application without sending it
    Preview {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// List the records of one dashboard section
    List {
        /// pending, approved, rejected or all
        #[arg(long, default_value = "pending")]
        section: Section,
        /// Match name, PRN, branch or division
        #[arg(long)]
        search: Option<String>,
    },
    /// Most recent applications
    Recent {
        /// pending, approved, rejected or all
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        /// Only applications submitted in the last N days
        #[arg(long)]
        days: Option<i64>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Approve or reject a pending application
    Review {
        prn: String,
        /// approve or reject
        decision: Decision,
        /// Submission time, needed when the student has several pending applications
        #[arg(long)]
        timestamp: Option<String>,
        #[arg(long, default_value = "")]
        remark: String,
    },
    /// Leave type and monthly charts
    Stats,
    /// Open the interactive dashboard
    Tui,
}

fn open_repository(config: &AppConfig) -> Result<Box<dyn LeaveRepository>> {
    match &config.script_url {
        Some(url) => {
            info!(teacher = %config.teacher, "using spreadsheet record store");
            Ok(Box::new(SheetRepository::new(url, &config.teacher, config.http_timeout)?))
        }
        None => {
            let repo = FileLeaveRepository::new(&config.data_dir)?;
            info!(path = %repo.path().display(), "using local record store");
            Ok(Box::new(repo))
        }
    }
}

fn base_application(config: &AppConfig) -> LeaveApplication {
    LeaveApplication {
        academic_year: config.academic_year.clone(),
        class_teacher: config.teacher.clone(),
        ..Default::default()
    }
}

fn dashboard_options(config: &AppConfig) -> DashboardOptions {
    DashboardOptions {
        recent_limit: config.recent_limit,
        trend_months: config.trend_months,
        ..Default::default()
    }
}

fn parse_review_timestamp(raw: Option<String>) -> Result<Option<DateTime<Utc>>> {
    raw.map(|t| parse_timestamp(&t).ok_or_else(|| anyhow!("Invalid timestamp: {}", t)))
        .transpose()
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    let _guard = logging::init(&config.log_dir())?;

    let result = run(cli, &config);
    if let Err(e) = &result {
        error!(error = %e, "command failed");
    }
    result
}

fn run(cli: Cli, config: &AppConfig) -> Result<()> {
    let today = Local::now().date_naive();

    match cli.command {
        Some(Commands::Days { from, to }) => {
            let start = parse_human_date(&from, today)?;
            let end = parse_human_date(&to, today)?;
            let summary = compute(Some(start), Some(end));
            if summary.is_empty() {
                println!("Invalid period: {} is after {}", start, end);
            } else {
                println!("{} to {}: {}", start, end, summary.describe());
            }
        }
        Some(Commands::Submit { args }) => {
            let application = build_application(&args, base_application(config), today)?;
            let service = LeaveService::new(open_repository(config)?);
            let summary = service.submit(&application, Utc::now())?;
            println!("Leave application submitted for {}", application.prn.trim());
            println!("  Period: {}", summary.describe());
            println!("  Status: Pending");
        }
        Some(Commands::Preview { args }) => {
            let application = build_application(&args, base_application(config), today)?;
            print!("{}", preview::render(&application));
            if let Err(e) = application.validate(today) {
                println!("\nNot ready to submit: {}", e);
            }
        }
        Some(Commands::List { section, search }) => {
            let records = LeaveService::new(open_repository(config)?).snapshot()?;
            let view = DashboardView::build(&records, &dashboard_options(config));
            table::show_counts(&view.counts);
            let rows = DashboardView::section(&records, section, search.as_deref().unwrap_or(""));
            table::show_records(&format!("{} leaves", section), &rows);
        }
        Some(Commands::Recent { status, days, limit }) => {
            let records = LeaveService::new(open_repository(config)?).snapshot()?;
            let options = DashboardOptions {
                recent_limit: limit.unwrap_or(config.recent_limit),
                status_filter: status.clone(),
                max_age_days: days,
                ..dashboard_options(config)
            };
            let rows = DashboardView::build(&records, &options).recent;
            table::show_records(&format!("Recent applications ({})", status), &rows);
        }
        Some(Commands::Review { prn, decision, timestamp, remark }) => {
            let timestamp = parse_review_timestamp(timestamp)?;
            let service = LeaveService::new(open_repository(config)?);
            let update = service.review(&prn, timestamp, decision, &remark)?;
            println!("{} (row {}) marked {}", update.prn, update.row, update.status);
        }
        Some(Commands::Stats) => {
            let records = LeaveService::new(open_repository(config)?).snapshot()?;
            stats::run(records, config.trend_months)?;
        }
        Some(Commands::Tui) | None => {
            let service = LeaveService::new(open_repository(config)?);
            tui::run(service, dashboard_options(config))?;
        }
    }
    Ok(())
}
