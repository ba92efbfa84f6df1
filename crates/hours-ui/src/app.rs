//! Main application state and TUI event loop.
//!
//! [`App`] owns the theme, the view mode and the date cursor. The chart data
//! is computed once before the loop starts and never changes.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    text::Text,
    widgets::Paragraph,
    Frame, Terminal,
};
use tracing::debug;

use hours_data::analysis::ChartData;

use crate::chart_view;
use crate::components::header::Header;
use crate::table_view::{self, TableTotals};
use crate::themes::Theme;

// ── ViewMode ──────────────────────────────────────────────────────────────────

/// Which view the TUI is currently rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Per-person line chart with sprint labels.
    Chart,
    /// Per-person summary table.
    Table,
}

impl ViewMode {
    /// `"table"` selects the table; anything else the chart.
    pub fn from_name(name: &str) -> Self {
        match name {
            "table" => Self::Table,
            _ => Self::Chart,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Chart => Self::Table,
            Self::Table => Self::Chart,
        }
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the TUI.
pub struct App {
    pub theme: Theme,
    pub view_mode: ViewMode,
    /// Data file name shown in the header.
    pub data_file: String,
    /// Assumed year shown in the header.
    pub year: i32,
    /// Index into [`ChartData::dates`] of the highlighted date.
    pub cursor: usize,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    pub fn new(theme_name: &str, view_mode: ViewMode, data_file: String, year: i32) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            view_mode,
            data_file,
            year,
            cursor: 0,
            should_quit: false,
        }
    }

    /// Apply one key press. `date_count` bounds the cursor.
    ///
    /// `q`, `Q` and `Ctrl+C` quit, `Tab` switches view, `←`/`→` move the
    /// cursor one date, `Home`/`End` jump to the first or last date.
    pub fn handle_key(&mut self, key: KeyEvent, date_count: usize) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let last = date_count.saturating_sub(1);
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Tab => self.view_mode = self.view_mode.toggled(),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(last),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = last,
            _ => {}
        }
    }

    /// Run the interactive TUI over `chart` until the user quits.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout. The terminal is
    /// restored on the way out whether drawing succeeded or not.
    pub fn run(mut self, chart: &ChartData) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame, chart)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => self.handle_key(key, chart.dates.len()),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                debug!("Quit requested");
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    /// Render the current application state into `frame`.
    pub fn render(&self, frame: &mut Frame, chart: &ChartData) {
        let [header_area, body_area] =
            Layout::vertical([Constraint::Length(Header::height()), Constraint::Min(0)])
                .areas(frame.area());

        let header = Header::new(&self.data_file, self.year, &self.theme);
        frame.render_widget(Paragraph::new(Text::from(header.to_lines())), header_area);

        // The pipeline rejects data without series; this only guards a
        // hand-built `ChartData`.
        if chart.series.is_empty() {
            table_view::render_no_data(frame, body_area, &self.theme);
            return;
        }

        match self.view_mode {
            ViewMode::Chart => {
                chart_view::render_chart_view(frame, body_area, chart, self.cursor, &self.theme)
            }
            ViewMode::Table => {
                let rows = chart.totals();
                let totals = TableTotals::from_chart(chart, &rows);
                table_view::render_table_view(frame, body_area, &rows, &totals, &self.theme);
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
