//! Per-person summary table.
//!
//! Renders a bordered [`ratatui::widgets::Table`] with one row per person
//! plus a highlighted totals row at the bottom.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use hours_core::formatting::{format_hours, format_number};
use hours_data::aggregator::PersonTotals;
use hours_data::analysis::ChartData;

use crate::themes::Theme;

const HEADERS: [&str; 6] = ["Person", "Total", "Days", "Peak", "Sprints", "Share"];

/// Aggregated totals across all persons.
#[derive(Debug, Clone, PartialEq)]
pub struct TableTotals {
    /// Hours summed over everyone.
    pub total_hours: f64,
    /// Distinct date strings in the data.
    pub days: usize,
    /// Largest single-date value of anyone.
    pub peak_hours: f64,
    pub sprints: usize,
    pub persons: usize,
}

impl TableTotals {
    pub fn from_chart(chart: &ChartData, rows: &[PersonTotals]) -> Self {
        Self {
            total_hours: rows.iter().map(|r| r.total_hours).sum(),
            days: chart.dates.len(),
            peak_hours: chart.max_hours,
            sprints: chart.spans.len(),
            persons: rows.len(),
        }
    }
}

/// Width of the person column: the widest name or header, plus padding.
pub fn person_column_width(rows: &[PersonTotals]) -> u16 {
    let widest = rows
        .iter()
        .map(|r| r.person.width())
        .chain(std::iter::once(HEADERS[0].width()))
        .max()
        .unwrap_or(0);
    (widest + 2).min(u16::MAX as usize) as u16
}

/// Render the summary table into `area`.
pub fn render_table_view(
    frame: &mut Frame,
    area: Rect,
    rows: &[PersonTotals],
    totals: &TableTotals,
    theme: &Theme,
) {
    let header = Row::new(
        HEADERS
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    )
    .height(1);

    let data_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![
                Cell::from(row.person.clone()).style(theme.series_style(i)),
                Cell::from(format_hours(row.total_hours)),
                Cell::from(row.active_days.to_string()),
                Cell::from(format!("{} ({})", format_hours(row.peak_hours), row.peak_date)),
                Cell::from(row.sprints.join(", ")),
                Cell::from(format!("{}%", format_number(row.share_pct, 1))),
            ])
            .style(style)
        })
        .collect();

    let total_row = Row::new(vec![
        Cell::from("TOTAL"),
        Cell::from(format_hours(totals.total_hours)),
        Cell::from(totals.days.to_string()),
        Cell::from(format_hours(totals.peak_hours)),
        Cell::from(format!("{} sprints", totals.sprints)),
        Cell::from(format!("{} persons", totals.persons)),
    ])
    .style(theme.table_total);

    let mut all_rows = data_rows;
    all_rows.push(total_row);

    let widths = [
        Constraint::Length(person_column_width(rows).max(7)),
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Length(16),
        Constraint::Min(20),
        Constraint::Length(10),
    ];

    let table = Table::new(all_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Hours per person "),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Render a "no data" placeholder when there are no persons to show.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No hours recorded", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Check that the data file lists tasks with a person and hours.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text))
            .block(Block::default().borders(Borders::ALL).title(" Sprint Hours ")),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use hours_core::models::DayEntry;
    use hours_data::analysis::{build_chart_data, AnalysisOptions};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn make_chart() -> ChartData {
        let entries: Vec<DayEntry> = serde_json::from_value(serde_json::json!([
            {"date": "6/14", "sprint": "S1", "tasks": [{"person": "Alice/Bob", "hours": 3}]},
            {"date": "6/15", "sprint": "S1", "tasks": [{"person": "Alice", "hours": 2}]},
            {"date": "6/29", "sprint": "S2", "tasks": [{"person": "Bob", "hours": 4.5}]},
        ]))
        .unwrap();
        build_chart_data(&entries, &AnalysisOptions::default()).unwrap()
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_table_totals_from_chart() {
        let chart = make_chart();
        let rows = chart.totals();
        let totals = TableTotals::from_chart(&chart, &rows);

        assert_eq!(totals.total_hours, 12.5);
        assert_eq!(totals.days, 3);
        assert_eq!(totals.peak_hours, 4.5);
        assert_eq!(totals.sprints, 2);
        assert_eq!(totals.persons, 2);
    }

    #[test]
    fn test_person_column_width() {
        let chart = make_chart();
        let rows = chart.totals();
        // "Person" is wider than "Alice" and "Bob".
        assert_eq!(person_column_width(&rows), 8);

        let mut wide = rows.clone();
        wide[0].person = "Maximiliane".to_string();
        assert_eq!(person_column_width(&wide), 13);

        wide[0].person = "小林さくら".to_string();
        assert_eq!(person_column_width(&wide), 12);
    }

    #[test]
    fn test_person_column_width_empty() {
        assert_eq!(person_column_width(&[]), 8);
    }

    #[test]
    fn test_render_table_view_shows_rows_and_total() {
        let backend = TestBackend::new(100, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let chart = make_chart();
        let rows = chart.totals();
        let totals = TableTotals::from_chart(&chart, &rows);

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_table_view(frame, area, &rows, &totals, &theme);
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Alice"));
        assert!(text.contains("Bob"));
        assert!(text.contains("TOTAL"));
        assert!(text.contains("12.5h"));
        assert!(text.contains("S1, S2"));
    }

    #[test]
    fn test_render_table_view_empty_rows_does_not_panic() {
        let backend = TestBackend::new(80, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::light();
        let totals = TableTotals {
            total_hours: 0.0,
            days: 0,
            peak_hours: 0.0,
            sprints: 0,
            persons: 0,
        };

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_table_view(frame, area, &[], &totals, &theme);
            })
            .unwrap();
    }

    #[test]
    fn test_render_no_data() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_no_data(frame, area, &theme);
            })
            .unwrap();

        assert!(buffer_text(&terminal).contains("No hours recorded"));
    }
}
