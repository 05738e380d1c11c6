use anyhow::Result;
use leavedesk_core::{
    Decision, DashboardOptions, DashboardView, LeaveRecord, LeaveRepository, LeaveService,
    Section, StatusCounts,
};
use ratatui::widgets::TableState;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Searching,
    Remark(Decision),
}

pub struct App<R: LeaveRepository> {
    pub service: LeaveService<R>,
    pub options: DashboardOptions,
    pub records: Vec<LeaveRecord>,
    pub counts: StatusCounts,
    pub rows: Vec<LeaveRecord>,
    pub recent: Vec<LeaveRecord>,
    pub state: TableState,
    pub input: String,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub message: Option<String>,
}

impl<R: LeaveRepository> App<R> {
    pub fn new(service: LeaveService<R>, options: DashboardOptions) -> Result<Self> {
        let records = service.snapshot()?;
        let mut app = App {
            service,
            options,
            records,
            counts: StatusCounts::default(),
            rows: Vec::new(),
            recent: Vec::new(),
            state: TableState::default(),
            input: String::new(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            message: None,
        };
        app.refresh_view();
        Ok(app)
    }

    /// Rebuilds the derived tables from the current snapshot.
    fn refresh_view(&mut self) {
        let view = DashboardView::build(&self.records, &self.options);
        self.counts = view.counts;
        self.rows = view.section_rows.into_iter().cloned().collect();
        self.recent = view.recent.into_iter().cloned().collect();

        match self.state.selected() {
            _ if self.rows.is_empty() => self.state.select(None),
            Some(i) if i >= self.rows.len() => self.state.select(Some(self.rows.len() - 1)),
            None => self.state.select(Some(0)),
            Some(_) => {}
        }
    }

    pub fn reload(&mut self) {
        match self.service.snapshot() {
            Ok(records) => {
                self.records = records;
                self.refresh_view();
            }
            Err(e) => {
                warn!(error = %e, "reload failed");
                self.message = Some(format!("Reload failed: {}", e));
            }
        }
    }

    pub fn selected(&self) -> Option<&LeaveRecord> {
        self.state.selected().and_then(|i| self.rows.get(i))
    }

    pub fn next(&mut self) {
        if self.rows.is_empty() {
            return;
        }

        let i = match self.state.selected() {
            Some(i) => {
                if i >= self.rows.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
        self.message = None;
    }

    pub fn previous(&mut self) {
        if self.rows.is_empty() {
            return;
        }

        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    self.rows.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
        self.message = None;
    }

    pub fn next_section(&mut self) {
        self.options.section = self.options.section.next();
        self.state.select(None);
        self.refresh_view();
    }

    pub fn select_section(&mut self, section: Section) {
        self.options.section = section;
        self.state.select(None);
        self.refresh_view();
    }

    pub fn enter_search_mode(&mut self) {
        self.input_mode = InputMode::Searching;
        self.input = self.options.search.clone();
        self.cursor_position = self.input.chars().count();
    }

    pub fn enter_remark_mode(&mut self, decision: Decision) {
        let refusal = match self.selected() {
            Some(record) if record.is_pending() => None,
            Some(record) => Some(format!("{} is already {}", record.prn, record.status)),
            None => return,
        };

        match refusal {
            Some(message) => self.message = Some(message),
            None => {
                self.input_mode = InputMode::Remark(decision);
                self.input.clear();
                self.cursor_position = 0;
            }
        }
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self.input.chars().take(self.cursor_position).map(|c| c.len_utf8()).sum();
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
        self.live_search();
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index: usize = self.input.chars().take(self.cursor_position - 1).map(|c| c.len_utf8()).sum();
            self.input.remove(byte_index);
            self.cursor_position -= 1;
            self.live_search();
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    // Search narrows the table as the user types.
    fn live_search(&mut self) {
        if self.input_mode == InputMode::Searching {
            self.options.search = self.input.clone();
            self.refresh_view();
        }
    }

    pub fn submit_input(&mut self) {
        if let InputMode::Remark(decision) = self.input_mode {
            self.submit_review(decision);
        }

        self.input.clear();
        self.cursor_position = 0;
        self.exit_input_mode();
    }

    fn submit_review(&mut self, decision: Decision) {
        let Some(record) = self.selected() else {
            return;
        };
        let (prn, timestamp) = (record.prn.clone(), record.timestamp);

        match self.service.review(&prn, timestamp, decision, &self.input) {
            Ok(update) => {
                info!(row = update.row, prn = %update.prn, "reviewed from dashboard");
                self.message = Some(format!("{} marked {}", update.prn, update.status));
            }
            Err(e) => {
                warn!(prn = %prn, error = %e, "review failed");
                self.message = Some(format!("Review failed: {}", e));
            }
        }
        // Always re-read: the store is the source of truth.
        self.reload();
    }
}
