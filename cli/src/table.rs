use leavedesk_core::{format_display_date, LeaveRecord, StatusCounts};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};
use unicode_width::UnicodeWidthChar;

const NAME_WIDTH: usize = 22;
const REASON_WIDTH: usize = 30;

#[derive(Tabled)]
struct LeaveRow {
    #[tabled(rename = "Row")]
    row: usize,
    #[tabled(rename = "Submitted")]
    submitted: String,
    #[tabled(rename = "PRN")]
    prn: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Class")]
    class: String,
    #[tabled(rename = "Type")]
    leave_type: String,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Days")]
    days: u32,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

impl LeaveRow {
    fn from_record(record: &LeaveRecord) -> Self {
        let class = match (record.branch.is_empty(), record.division.is_empty()) {
            (false, false) => format!("{} {}", record.branch, record.division),
            (false, true) => record.branch.clone(),
            (true, false) => record.division.clone(),
            (true, true) => "-".to_string(),
        };

        Self {
            row: record.row,
            submitted: record
                .timestamp
                .map(|ts| ts.with_timezone(&chrono::Local).format("%d/%m/%Y %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
            prn: record.prn.clone(),
            name: truncate(&record.full_name, NAME_WIDTH),
            class,
            leave_type: record.leave_type_label().to_string(),
            from: format_display_date(record.from_date),
            to: format_display_date(record.to_date),
            days: record.display_days(),
            status: record.status.to_string(),
            reason: truncate(&record.reason, REASON_WIDTH),
        }
    }
}

pub fn show_records(title: &str, records: &[&LeaveRecord]) {
    println!("\n\x1b[1;36m{}\x1b[0m ({})", title, records.len());

    if records.is_empty() {
        println!("No leave records found.");
        return;
    }

    let rows: Vec<LeaveRow> = records.iter().map(|r| LeaveRow::from_record(r)).collect();
    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN)); // Header color

    println!("{}", table);
}

pub fn show_counts(counts: &StatusCounts) {
    println!(
        "Pending: \x1b[33m{}\x1b[0m  Approved: \x1b[32m{}\x1b[0m  Rejected: \x1b[31m{}\x1b[0m  Total: {}",
        counts.pending, counts.approved, counts.rejected, counts.total
    );
}

/// Cuts `text` to at most `max_width` terminal columns, marking the cut with `…`.
pub fn truncate(text: &str, max_width: usize) -> String {
    let total: usize = text.chars().filter_map(|c| c.width()).sum();
    if total <= max_width {
        return text.to_string();
    }

    let mut out = String::new();
    let mut width = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if width + w + 1 > max_width {
            break;
        }
        out.push(c);
        width += w;
    }
    out.push('…');
    out
}
