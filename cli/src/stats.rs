use std::{io, time::Duration};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use leavedesk_core::service::aggregator::{count_by_status, group_by_leave_type, monthly_trend};
use leavedesk_core::{LeaveRecord, MonthBucket, StatusCounts};
use ratatui::{
    prelude::*,
    widgets::{Bar, BarChart, BarGroup, Block, BorderType, Borders, Gauge, Padding, Paragraph},
};

const MIN_MONTHS: usize = 3;
const MAX_MONTHS: usize = 24;

// --- THEME ---
struct Theme {
    primary: Color,
    muted: Color,
    text: Color,
    pending: Color,
    approved: Color,
    rejected: Color,
    trend: Color,
}

const THEME: Theme = Theme {
    primary: Color::Cyan,
    muted: Color::DarkGray,
    text: Color::White,
    pending: Color::Yellow,
    approved: Color::Green,
    rejected: Color::Red,
    trend: Color::Blue,
};

const TYPE_COLORS: [Color; 4] = [Color::Magenta, Color::Cyan, Color::Yellow, Color::Green];

pub struct StatsApp {
    pub counts: StatusCounts,
    pub leave_types: Vec<(String, usize)>,
    pub trend: Vec<MonthBucket>,
    pub months: usize,
    records: Vec<LeaveRecord>,
}

impl StatsApp {
    pub fn new(records: Vec<LeaveRecord>, months: usize) -> Self {
        let months = months.clamp(MIN_MONTHS, MAX_MONTHS);
        Self {
            counts: count_by_status(&records),
            leave_types: group_by_leave_type(&records),
            trend: monthly_trend(&records, months),
            months,
            records,
        }
    }

    pub fn widen(&mut self) {
        if self.months < MAX_MONTHS {
            self.months += 1;
            self.trend = monthly_trend(&self.records, self.months);
        }
    }

    pub fn narrow(&mut self) {
        if self.months > MIN_MONTHS {
            self.months -= 1;
            self.trend = monthly_trend(&self.records, self.months);
        }
    }
}

pub fn run(records: Vec<LeaveRecord>, months: usize) -> Result<()> {
    if records.is_empty() {
        println!("No leave records available.");
        return Ok(());
    }

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = StatsApp::new(records, months);

    // Main loop
    loop {
        terminal.draw(|f| ui(f, &app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break,
                        KeyCode::Left | KeyCode::Char('h') => app.narrow(),
                        KeyCode::Right | KeyCode::Char('l') => app.widen(),
                        _ => {}
                    }
                }
            }
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

fn ui(frame: &mut Frame, app: &StatsApp) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Charts + summary
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    // --- Header ---
    let header_block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(THEME.muted));
    let title = Paragraph::new(Span::styled(
        "LEAVE STATISTICS",
        Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD),
    ))
    .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(title, main_layout[0]);
    frame.render_widget(header_block, main_layout[0]);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(75),
            Constraint::Length(1), // Gutter
            Constraint::Percentage(25),
        ])
        .split(main_layout[1]);

    let charts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(content[0]);

    draw_leave_types(frame, &app.leave_types, charts[0]);
    draw_trend(frame, &app.trend, charts[1]);
    draw_summary(frame, &app.counts, content[2]);

    // --- Footer ---
    let help = Line::from(vec![
        Span::styled("MONTHS: ", Style::default().fg(THEME.muted)),
        Span::styled("←/→ ", Style::default().fg(THEME.text)),
        Span::raw("  "),
        Span::styled("QUIT: ", Style::default().fg(THEME.muted)),
        Span::styled("q", Style::default().fg(THEME.text)),
    ]);
    frame.render_widget(
        Paragraph::new(help).alignment(Alignment::Center),
        main_layout[2],
    );
}

fn chart_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(THEME.muted))
        .title(title)
}

fn draw_leave_types(frame: &mut Frame, groups: &[(String, usize)], area: Rect) {
    let bars: Vec<Bar> = groups
        .iter()
        .enumerate()
        .map(|(i, (label, count))| {
            Bar::default()
                .label(label.as_str())
                .value(*count as u64)
                .style(Style::default().fg(TYPE_COLORS[i % TYPE_COLORS.len()]))
        })
        .collect();

    let chart = BarChart::default()
        .block(chart_block(" Leave Types ".to_string()))
        .bar_width(9)
        .bar_gap(2)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

fn draw_trend(frame: &mut Frame, trend: &[MonthBucket], area: Rect) {
    let bars: Vec<Bar> = trend
        .iter()
        .map(|bucket| {
            Bar::default()
                .label(bucket.label.as_str())
                .value(bucket.count as u64)
                .style(Style::default().fg(THEME.trend))
        })
        .collect();

    let chart = BarChart::default()
        .block(chart_block(format!(" Applications per Month (last {}) ", trend.len())))
        .bar_width(6)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

fn draw_summary(frame: &mut Frame, counts: &StatusCounts, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(1)])
        .split(area);

    let line = |label: &'static str, value: usize, color: Color| {
        Line::from(vec![
            Span::styled(label, Style::default().fg(THEME.muted)),
            Span::styled(
                value.to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ])
    };

    let info_text = vec![
        Line::from(Span::styled("Overview", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        line("Pending:  ", counts.pending, THEME.pending),
        line("Approved: ", counts.approved, THEME.approved),
        line("Rejected: ", counts.rejected, THEME.rejected),
        Line::from(""),
        line("Total:    ", counts.total, THEME.text),
    ];
    let info = Paragraph::new(info_text).block(chart_block(" Summary ".to_string()));
    frame.render_widget(info, chunks[0]);

    // Share of decided applications that were approved
    let decided = counts.approved + counts.rejected;
    let ratio = if decided > 0 {
        counts.approved as f64 / decided as f64
    } else {
        0.0
    };
    let gauge = Gauge::default()
        .block(chart_block(" Approval Rate ".to_string()))
        .gauge_style(Style::default().fg(THEME.approved))
        .ratio(ratio)
        .label(format!("{:.0}%", ratio * 100.0));
    frame.render_widget(gauge, chunks[1]);
}
