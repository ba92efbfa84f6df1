//! Per-person hours line chart.
//!
//! One braille line per person over a shared day axis, a ribbon of sprint
//! labels above the plot at each sprint's start column, and a detail line
//! for the date under the cursor.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use hours_core::formatting::format_hours;
use hours_data::analysis::ChartData;

use crate::themes::Theme;

/// Column of `x` within a plot `width` columns wide spanning `[x_min, x_max]`.
///
/// Monotone in `x` and clamped to `0..width`. A degenerate range maps every
/// value to the first column.
pub fn label_column(x: f64, x_min: f64, x_max: f64, width: u16) -> u16 {
    if width == 0 || x_max <= x_min {
        return 0;
    }
    let frac = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (frac * f64::from(width - 1)).round() as u16
}

/// Cut `s` to at most `max` display columns.
fn truncate_to_width(s: &str, max: usize) -> (String, usize) {
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max {
            break;
        }
        out.push(c);
        used += w;
    }
    (out, used)
}

/// Sprint labels laid out on a single row `width` columns wide.
///
/// Each label starts at its span's start column. A label that would collide
/// with the previous one is pushed right, keeping a one-column gap, and
/// labels running past the edge are truncated or dropped.
pub fn ribbon_text(chart: &ChartData, width: u16) -> String {
    let [x_min, x_max] = chart.x_bounds();
    let width = usize::from(width);
    let mut out = String::new();
    let mut used = 0usize;

    for span in &chart.spans {
        let col = usize::from(label_column(
            chart.x_of(span.start_key),
            x_min,
            x_max,
            width as u16,
        ));
        let start = if used == 0 { col } else { col.max(used + 1) };
        if start >= width {
            break;
        }
        let (label, label_width) = truncate_to_width(&span.sprint, width - start);
        out.push_str(&" ".repeat(start - used));
        out.push_str(&label);
        used = start + label_width;
    }
    out
}

/// Vertical axis labels: zero, midpoint, top.
fn y_labels(chart: &ChartData) -> Vec<String> {
    let top = chart.y_axis_max();
    vec![
        format_hours(0.0),
        format_hours(top / 2.0),
        format_hours(top),
    ]
}

/// Horizontal axis labels: first and last date strings.
fn x_labels(chart: &ChartData) -> Vec<String> {
    match (chart.dates.first(), chart.dates.last()) {
        (Some(first), Some(last)) if chart.dates.len() > 1 => {
            vec![first.date.clone(), last.date.clone()]
        }
        (Some(only), _) => vec![only.date.clone(), String::new()],
        _ => vec![String::new(), String::new()],
    }
}

/// Columns taken by the y-axis labels and axis line inside the chart block.
fn plot_offset(chart: &ChartData) -> u16 {
    let y_width = y_labels(chart).iter().map(|l| l.width()).max().unwrap_or(0);
    let x_first = x_labels(chart).first().map(|l| l.width()).unwrap_or(0);
    (y_width.max(x_first) + 1) as u16
}

/// Detail line for the date at `cursor` in `chart.dates`.
///
/// Shows the date, its sprint, and the hours of every person with a point on
/// that exact date string.
pub fn detail_line(chart: &ChartData, cursor: usize, theme: &Theme) -> Line<'static> {
    let Some(tick) = chart.dates.get(cursor) else {
        return Line::from(Span::styled("No dates", theme.dim));
    };

    let mut spans = vec![
        Span::styled("Date: ", theme.label),
        Span::styled(tick.date.clone(), theme.value),
        Span::styled("  Sprint: ", theme.label),
        Span::styled(tick.sprint.clone(), theme.sprint_label),
    ];
    for (i, series) in chart.series.iter().enumerate() {
        if let Some(point) = series.point_for(&tick.date) {
            spans.push(Span::styled("  │ ", theme.separator));
            spans.push(Span::styled(
                format!("{}: ", series.person),
                theme.series_style(i),
            ));
            spans.push(Span::styled(format_hours(point.hours), theme.value));
        }
    }
    Line::from(spans)
}

/// Render the chart view into `area`.
pub fn render_chart_view(
    frame: &mut Frame,
    area: Rect,
    chart: &ChartData,
    cursor: usize,
    theme: &Theme,
) {
    let [ribbon_area, plot_area, detail_area, hint_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    // ── Sprint ribbon ─────────────────────────────────────────────────────────
    // Skip the block border and the y-axis gutter so columns line up with x.
    let offset = 1 + plot_offset(chart);
    let plot_width = plot_area.width.saturating_sub(offset + 1);
    let ribbon = format!(
        "{}{}",
        " ".repeat(usize::from(offset)),
        ribbon_text(chart, plot_width)
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(ribbon, theme.sprint_label))),
        ribbon_area,
    );

    // ── Chart ─────────────────────────────────────────────────────────────────
    let series_data: Vec<Vec<(f64, f64)>> = chart
        .series
        .iter()
        .map(|s| s.points.iter().map(|p| (chart.x_of(p.key), p.hours)).collect())
        .collect();
    let span_markers: Vec<(f64, f64)> = chart
        .spans
        .iter()
        .map(|s| (chart.x_of(s.start_key), chart.label_height()))
        .collect();
    let cursor_line: Vec<(f64, f64)> = chart
        .dates
        .get(cursor)
        .map(|tick| {
            let x = chart.x_of(tick.key);
            vec![(x, 0.0), (x, chart.y_axis_max())]
        })
        .unwrap_or_default();

    let mut datasets: Vec<Dataset> = chart
        .series
        .iter()
        .zip(&series_data)
        .enumerate()
        .map(|(i, (series, data))| {
            Dataset::default()
                .name(series.person.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(theme.series_style(i))
                .data(data)
        })
        .collect();
    datasets.push(
        Dataset::default()
            .marker(Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(theme.sprint_label)
            .data(&span_markers),
    );
    datasets.push(
        Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme.cursor.bg.unwrap_or_default()))
            .data(&cursor_line),
    );

    let x_axis = Axis::default()
        .title(Span::styled("Date", theme.label))
        .style(theme.axis)
        .bounds(chart.x_bounds())
        .labels(x_labels(chart));
    let y_axis = Axis::default()
        .title(Span::styled("Hours", theme.label))
        .style(theme.axis)
        .bounds([0.0, chart.y_axis_max()])
        .labels(y_labels(chart));

    let widget = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Hours worked per person by sprint "),
        )
        .x_axis(x_axis)
        .y_axis(y_axis);
    frame.render_widget(widget, plot_area);

    // ── Detail & hint ─────────────────────────────────────────────────────────
    frame.render_widget(
        Paragraph::new(detail_line(chart, cursor, theme)),
        detail_area,
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "←/→ move date  Tab summary table  q quit",
            theme.dim,
        ))),
        hint_area,
    );
}

// ── Tests ─────────────────────────────────────────────────────────────────────
