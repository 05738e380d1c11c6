pub mod app;
pub mod ui;

use std::io;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use leavedesk_core::{Decision, DashboardOptions, LeaveRepository, LeaveService, Section};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::error;

use crate::tui::app::{App, InputMode};

pub fn run<R: LeaveRepository>(service: LeaveService<R>, options: DashboardOptions) -> Result<()> {
    // Load before touching the terminal so fetch errors print normally.
    let mut app = App::new(service, options)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = %err, "dashboard loop failed");
        println!("{:?}", err);
    }

    Ok(())
}

fn run_app<B: Backend, R: LeaveRepository>(
    terminal: &mut Terminal<B>,
    app: &mut App<R>,
) -> io::Result<()> {
    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .map_err(|e| io::Error::other(e.to_string()))?;

        if !event::poll(std::time::Duration::from_millis(250))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.input_mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Tab => app.next_section(),
                KeyCode::Char('1') => app.select_section(Section::Pending),
                KeyCode::Char('2') => app.select_section(Section::Approved),
                KeyCode::Char('3') => app.select_section(Section::Rejected),
                KeyCode::Char('4') => app.select_section(Section::All),
                KeyCode::Char('/') => app.enter_search_mode(),
                KeyCode::Char('a') => app.enter_remark_mode(Decision::Approve),
                KeyCode::Char('r') => app.enter_remark_mode(Decision::Reject),
                KeyCode::Char('g') => app.reload(),
                _ => {}
            },
            InputMode::Searching | InputMode::Remark(_) => match key.code {
                KeyCode::Enter => app.submit_input(),
                KeyCode::Esc => app.exit_input_mode(),
                KeyCode::Char(c) => app.input_char(c),
                KeyCode::Backspace => app.delete_char(),
                KeyCode::Left => app.move_cursor_left(),
                KeyCode::Right => app.move_cursor_right(),
                _ => {}
            },
        }
    }
}
