use leavedesk_core::{format_display_date, LeaveRecord, LeaveRepository, LeaveStatus, Section};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::table::truncate;
use crate::tui::app::{App, InputMode};

pub fn draw<R: LeaveRepository>(f: &mut Frame, app: &mut App<R>) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Counts + sections
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Footer/Help
        ])
        .split(size);

    let header = Paragraph::new("LEAVE DASHBOARD")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, main_chunks[0]);

    draw_overview(f, app, main_chunks[1]);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(main_chunks[2]);

    draw_record_list(f, app, content_chunks[0]);

    let side_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(content_chunks[1]);

    draw_detail_view(f, app, side_chunks[0]);
    draw_recent(f, app, side_chunks[1]);

    draw_footer(f, app, main_chunks[3]);
}

fn status_style(status: &LeaveStatus) -> Style {
    match status {
        LeaveStatus::Pending => Style::default().fg(Color::Yellow),
        LeaveStatus::Approved => Style::default().fg(Color::Green),
        LeaveStatus::Rejected => Style::default().fg(Color::Red),
        LeaveStatus::Other(_) => Style::default().fg(Color::DarkGray),
    }
}

fn draw_overview<R: LeaveRepository>(f: &mut Frame, app: &App<R>, area: Rect) {
    let counts = &app.counts;
    let mut spans = vec![
        Span::styled(format!(" Pending {} ", counts.pending), Style::default().fg(Color::Yellow)),
        Span::styled(format!(" Approved {} ", counts.approved), Style::default().fg(Color::Green)),
        Span::styled(format!(" Rejected {} ", counts.rejected), Style::default().fg(Color::Red)),
        Span::raw(format!(" Total {} ", counts.total)),
        Span::styled("  │  ", Style::default().fg(Color::DarkGray)),
    ];

    for (i, section) in Section::ALL.iter().enumerate() {
        let style = if *section == app.options.section {
            Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {}:{} ", i + 1, section), style));
    }

    let overview = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(overview, area);
}

fn draw_record_list<R: LeaveRepository>(f: &mut Frame, app: &mut App<R>, area: Rect) {
    let rows: Vec<Row> = app
        .rows
        .iter()
        .map(|record| {
            Row::new(vec![
                Span::raw(record.prn.clone()),
                Span::styled(
                    truncate(&record.full_name, 24),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(record.leave_type_label().to_string()),
                Span::raw(record.display_days().to_string()),
                Span::styled(record.status.to_string(), status_style(&record.status)),
            ])
        })
        .collect();

    let title = if app.options.search.trim().is_empty() {
        format!(" {} ({}) ", app.options.section, app.rows.len())
    } else {
        format!(
            " {} ({}) matching \"{}\" ",
            app.options.section,
            app.rows.len(),
            app.options.search.trim()
        )
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(12), // PRN
            Constraint::Min(12),    // Name
            Constraint::Length(10), // Type
            Constraint::Length(4),  // Days
            Constraint::Length(9),  // Status
        ],
    )
    .header(Row::new(vec!["PRN", "Name", "Type", "Days", "Status"]).style(Style::default().fg(Color::Yellow)))
    .block(Block::default().title(title).borders(Borders::ALL).border_type(BorderType::Rounded))
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn field<'a>(label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(label, Style::default().fg(Color::Blue)),
        Span::raw(value),
    ])
}

fn detail_lines(record: &LeaveRecord) -> Vec<Line<'_>> {
    let summary = record.summary();
    let days = if summary.is_empty() {
        record
            .reported_days
            .map(|d| format!("{} (as submitted)", d))
            .unwrap_or_else(|| "-".to_string())
    } else {
        summary.describe()
    };

    let mut lines = vec![
        Line::from(Span::styled(
            record.full_name.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        field("PRN: ", record.prn.clone()),
        field("Class: ", format!("{} {}", record.branch, record.division)),
        field("Email: ", record.email.clone()),
        field("Contact: ", record.contact.clone()),
        field(
            "Submitted: ",
            record
                .timestamp
                .map(|ts| ts.with_timezone(&chrono::Local).format("%d/%m/%Y %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
        ),
        field("Type: ", record.leave_type_label().to_string()),
        field(
            "Period: ",
            format!(
                "{} to {}",
                format_display_date(record.from_date),
                format_display_date(record.to_date)
            ),
        ),
        field("Days: ", days),
        Line::from(vec![
            Span::styled("Status: ", Style::default().fg(Color::Blue)),
            Span::styled(record.status.to_string(), status_style(&record.status)),
        ]),
        Line::from(""),
        Line::from(Span::styled("Reason:", Style::default().fg(Color::Blue))),
        Line::from(record.reason.as_str()),
    ];

    if let Some(remarks) = &record.remarks {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Remarks:", Style::default().fg(Color::Blue))));
        lines.push(Line::from(remarks.as_str()));
    }
    lines
}

fn draw_detail_view<R: LeaveRepository>(f: &mut Frame, app: &App<R>, area: Rect) {
    let block = Block::default().title(" Detail ").borders(Borders::ALL).border_type(BorderType::Rounded);
    match app.selected() {
        Some(record) => {
            let detail = Paragraph::new(detail_lines(record))
                .block(block)
                .wrap(Wrap { trim: true });
            f.render_widget(detail, area);
        }
        None => f.render_widget(block, area),
    }
}

fn draw_recent<R: LeaveRepository>(f: &mut Frame, app: &App<R>, area: Rect) {
    let rows: Vec<Row> = app
        .recent
        .iter()
        .map(|record| {
            Row::new(vec![
                Span::raw(
                    record
                        .timestamp
                        .map(|ts| ts.with_timezone(&chrono::Local).format("%d/%m").to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Span::raw(truncate(&record.full_name, 18)),
                Span::styled(record.status.to_string(), status_style(&record.status)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [Constraint::Length(5), Constraint::Min(10), Constraint::Length(9)],
    )
    .block(
        Block::default()
            .title(format!(" Recent ({}) ", app.recent.len()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    f.render_widget(table, area);
}

fn draw_footer<R: LeaveRepository>(f: &mut Frame, app: &App<R>, area: Rect) {
    let footer = match app.input_mode {
        InputMode::Searching => Paragraph::new(format!("Search: {}", app.input))
            .style(Style::default().fg(Color::Cyan)),
        InputMode::Remark(decision) => Paragraph::new(format!("{:?} remark: {}", decision, app.input))
            .style(Style::default().fg(Color::Cyan)),
        InputMode::Normal => match &app.message {
            Some(message) => Paragraph::new(message.as_str()).style(Style::default().fg(Color::Yellow)),
            None => Paragraph::new(
                "j/k: Navigate | Tab/1-4: Section | /: Search | a: Approve | r: Reject | g: Reload | q: Quit",
            )
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        },
    };
    f.render_widget(footer, area);

    if app.input_mode != InputMode::Normal {
        let prefix = match app.input_mode {
            InputMode::Searching => "Search: ".len(),
            InputMode::Remark(decision) => format!("{:?} remark: ", decision).len(),
            InputMode::Normal => 0,
        };
        f.set_cursor_position((area.x + (prefix + app.cursor_position) as u16, area.y));
    }
}
