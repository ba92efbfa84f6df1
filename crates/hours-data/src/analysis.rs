//! Chart-data pipeline.
//!
//! Loads the day entries, runs the record ingestor and the sprint span
//! tracker over them in one forward pass, and packages the result as a
//! [`ChartData`] ready for the UI layer or JSON export.

use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

use chrono::Utc;
use hours_core::date_key::{DateKey, DateKeyParser, DEFAULT_YEAR};
use hours_core::error::Result;
use hours_core::models::{DayEntry, PersonSeries, SpanEndRule, SprintSpan};
use serde::Serialize;
use tracing::{debug, info};

use crate::aggregator::{HoursAggregator, PersonTotals, SeriesBuilder};
use crate::reader::load_day_entries;
use crate::spans::SprintSpanTracker;

/// Headroom above the tallest series for sprint labels.
pub const LABEL_HEIGHT_FACTOR: f64 = 1.05;

/// Upper bound of the vertical axis relative to the tallest series.
pub const Y_AXIS_FACTOR: f64 = 1.15;

// ── Public types ──────────────────────────────────────────────────────────────

/// Knobs for [`analyze_hours`] and [`build_chart_data`].
#[derive(Debug, Clone, Copy)]
pub struct AnalysisOptions {
    /// Year assumed for every `M/D` date.
    pub year: i32,
    /// How sprint end dates are chosen.
    pub span_end: SpanEndRule,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            year: DEFAULT_YEAR,
            span_end: SpanEndRule::default(),
        }
    }
}

/// One distinct date string seen in the input, for the shared x axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateTick {
    pub date: String,
    pub key: DateKey,
    /// Sprint of the first entry carrying this date string.
    pub sprint: String,
}

/// Metadata produced alongside the chart data.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisMetadata {
    /// RFC 3339 timestamp when this result was generated.
    pub generated_at: String,
    /// Input file, when the data came from disk.
    pub source: Option<String>,
    pub assumed_year: i32,
    pub span_end: SpanEndRule,
    pub entries_processed: usize,
    pub task_records: usize,
    pub contributions: usize,
    pub persons: usize,
    pub sprints: usize,
    /// Wall-clock seconds spent reading and parsing the file.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent aggregating.
    pub transform_time_seconds: f64,
}

/// Everything the rendering layer needs.
#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    /// One series per person, ordered by name.
    pub series: Vec<PersonSeries>,
    /// Sprint spans ordered by start date.
    pub spans: Vec<SprintSpan>,
    /// Distinct input dates in chronological order.
    pub dates: Vec<DateTick>,
    /// Largest hours value of any single point.
    pub max_hours: f64,
    pub metadata: AnalysisMetadata,
}

impl ChartData {
    /// Earliest observed date; x positions are measured from it.
    pub fn origin(&self) -> Option<DateKey> {
        self.dates.first().map(|d| d.key)
    }

    /// Horizontal position of `key`, in days since [`ChartData::origin`].
    pub fn x_of(&self, key: DateKey) -> f64 {
        self.origin()
            .map(|origin| key.days_since(origin) as f64)
            .unwrap_or(0.0)
    }

    /// `[first, last]` x positions, widened to one day when all data falls on
    /// a single date so the axis is never degenerate.
    pub fn x_bounds(&self) -> [f64; 2] {
        let last = self.dates.last().map(|d| self.x_of(d.key)).unwrap_or(0.0);
        [0.0, last.max(1.0)]
    }

    /// Upper bound of the vertical axis.
    pub fn y_axis_max(&self) -> f64 {
        if self.max_hours > 0.0 {
            self.max_hours * Y_AXIS_FACTOR
        } else {
            1.0
        }
    }

    /// Height at which sprint labels sit, just above the tallest series.
    pub fn label_height(&self) -> f64 {
        self.max_hours * LABEL_HEIGHT_FACTOR
    }

    /// Per-person summary rows in series order.
    pub fn totals(&self) -> Vec<PersonTotals> {
        HoursAggregator::person_totals(&self.series)
    }
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the full pipeline on the file at `path`.
///
/// 1. Load the day entries.
/// 2. Parse each date once and feed the ingestor and the span tracker.
/// 3. Compute the maximum hours value; no hours at all is an error.
/// 4. Return a [`ChartData`].
///
/// Any failure aborts the run; there is no partial result.
pub fn analyze_hours(path: &Path, options: &AnalysisOptions) -> Result<ChartData> {
    // ── Step 1: Load entries ──────────────────────────────────────────────────
    let load_start = Instant::now();
    let entries = load_day_entries(path)?;
    let load_time = load_start.elapsed().as_secs_f64();

    info!("Read {} day entries from {}", entries.len(), path.display());

    // ── Steps 2-4 ─────────────────────────────────────────────────────────────
    let mut chart = build_chart_data(&entries, options)?;
    chart.metadata.source = Some(path.display().to_string());
    chart.metadata.load_time_seconds = load_time;
    Ok(chart)
}

/// In-memory form of [`analyze_hours`] for entries that are already loaded.
pub fn build_chart_data(entries: &[DayEntry], options: &AnalysisOptions) -> Result<ChartData> {
    let parser = DateKeyParser::new(options.year);
    let transform_start = Instant::now();

    let mut builder = SeriesBuilder::new();
    let mut tracker = SprintSpanTracker::new(options.span_end);
    let mut seen_dates: HashSet<&str> = HashSet::new();
    let mut dates: Vec<DateTick> = Vec::new();

    for entry in entries {
        let key = parser.parse(&entry.date)?;
        builder.observe(entry, key);
        tracker.observe(entry, key);
        if seen_dates.insert(entry.date.as_str()) {
            dates.push(DateTick {
                date: entry.date.clone(),
                key,
                sprint: entry.sprint.clone(),
            });
        }
    }

    let (series_map, stats) = builder.finish();
    let spans = tracker.finish();
    dates.sort_by_key(|d| d.key);

    let max_hours = HoursAggregator::max_hours(series_map.values())?;
    let series: Vec<PersonSeries> = series_map.into_values().collect();
    let transform_time = transform_start.elapsed().as_secs_f64();

    debug!(
        "Built chart: {} persons, {} sprints, {} dates, max {} hours",
        series.len(),
        spans.len(),
        dates.len(),
        max_hours
    );

    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        source: None,
        assumed_year: options.year,
        span_end: options.span_end,
        entries_processed: stats.entries,
        task_records: stats.task_records,
        contributions: stats.contributions,
        persons: series.len(),
        sprints: spans.len(),
        load_time_seconds: 0.0,
        transform_time_seconds: transform_time,
    };

    Ok(ChartData {
        series,
        spans,
        dates,
        max_hours,
        metadata,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use hours_core::HoursError;
    use std::io::Write;
    use tempfile::TempDir;

    fn two_day_example() -> Vec<DayEntry> {
        serde_json::from_value(serde_json::json!([
            {"date": "6/14", "sprint": "S1", "tasks": [{"person": "Alice/Bob", "hours": 3}]},
            {"date": "6/15", "sprint": "S1", "tasks": [{"person": "Alice", "hours": 2}]},
        ]))
        .unwrap()
    }

    #[test]
    fn test_build_chart_data_two_day_example() {
        let chart = build_chart_data(&two_day_example(), &AnalysisOptions::default()).unwrap();

        assert_eq!(chart.series.len(), 2);
        let alice = &chart.series[0];
        assert_eq!(alice.person, "Alice");
        let alice_points: Vec<(&str, f64)> = alice
            .points
            .iter()
            .map(|p| (p.date.as_str(), p.hours))
            .collect();
        assert_eq!(alice_points, vec![("6/14", 3.0), ("6/15", 2.0)]);

        let bob = &chart.series[1];
        assert_eq!(bob.person, "Bob");
        assert_eq!(bob.points.len(), 1);
        assert_eq!(bob.points[0].hours, 3.0);

        assert_eq!(chart.spans.len(), 1);
        assert_eq!(chart.spans[0].start, "6/14");
        assert_eq!(chart.spans[0].end, "6/15");

        assert_eq!(chart.max_hours, 3.0);
    }

    #[test]
    fn test_build_chart_data_metadata() {
        let chart = build_chart_data(&two_day_example(), &AnalysisOptions::default()).unwrap();

        assert_eq!(chart.metadata.entries_processed, 2);
        assert_eq!(chart.metadata.task_records, 2);
        assert_eq!(chart.metadata.contributions, 3);
        assert_eq!(chart.metadata.persons, 2);
        assert_eq!(chart.metadata.sprints, 1);
        assert_eq!(chart.metadata.assumed_year, DEFAULT_YEAR);
        assert!(chart.metadata.source.is_none());
    }

    #[test]
    fn test_dates_are_distinct_and_chronological() {
        let entries: Vec<DayEntry> = serde_json::from_value(serde_json::json!([
            {"date": "6/20", "sprint": "S2", "tasks": [{"person": "Alice", "hours": 1}]},
            {"date": "6/3", "sprint": "S1", "tasks": [{"person": "Bob", "hours": 1}]},
            {"date": "6/20", "sprint": "S2", "tasks": [{"person": "Bob", "hours": 1}]},
        ]))
        .unwrap();
        let chart = build_chart_data(&entries, &AnalysisOptions::default()).unwrap();

        let dates: Vec<&str> = chart.dates.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["6/3", "6/20"]);
        assert_eq!(chart.dates[1].sprint, "S2");
        assert_eq!(chart.x_of(chart.dates[1].key), 17.0);
        assert_eq!(chart.x_bounds(), [0.0, 17.0]);
    }

    #[test]
    fn test_axis_helpers() {
        let chart = build_chart_data(&two_day_example(), &AnalysisOptions::default()).unwrap();

        assert!((chart.y_axis_max() - 3.45).abs() < 1e-9);
        assert!((chart.label_height() - 3.15).abs() < 1e-9);
    }

    #[test]
    fn test_x_bounds_single_date_is_widened() {
        let entries: Vec<DayEntry> = serde_json::from_value(serde_json::json!([
            {"date": "6/14", "sprint": "S1", "tasks": [{"person": "Alice", "hours": 4}]},
        ]))
        .unwrap();
        let chart = build_chart_data(&entries, &AnalysisOptions::default()).unwrap();
        assert_eq!(chart.x_bounds(), [0.0, 1.0]);
    }

    #[test]
    fn test_y_axis_max_all_zero_hours() {
        let entries: Vec<DayEntry> = serde_json::from_value(serde_json::json!([
            {"date": "6/14", "sprint": "S1", "tasks": [{"person": "Alice", "hours": 0}]},
        ]))
        .unwrap();
        let chart = build_chart_data(&entries, &AnalysisOptions::default()).unwrap();
        assert_eq!(chart.max_hours, 0.0);
        assert_eq!(chart.y_axis_max(), 1.0);
    }

    #[test]
    fn test_build_chart_data_empty_is_error() {
        let err = build_chart_data(&[], &AnalysisOptions::default()).unwrap_err();
        assert!(matches!(err, HoursError::EmptyData));
    }

    #[test]
    fn test_build_chart_data_entries_without_tasks_is_error() {
        let entries: Vec<DayEntry> = serde_json::from_value(serde_json::json!([
            {"date": "6/14", "sprint": "S1", "tasks": []},
        ]))
        .unwrap();
        let err = build_chart_data(&entries, &AnalysisOptions::default()).unwrap_err();
        assert!(matches!(err, HoursError::EmptyData));
    }

    #[test]
    fn test_build_chart_data_bad_date_is_error() {
        let entries: Vec<DayEntry> = serde_json::from_value(serde_json::json!([
            {"date": "6/14", "sprint": "S1", "tasks": [{"person": "Alice", "hours": 1}]},
            {"date": "June 14", "sprint": "S1", "tasks": [{"person": "Alice", "hours": 1}]},
        ]))
        .unwrap();
        let err = build_chart_data(&entries, &AnalysisOptions::default()).unwrap_err();
        assert!(matches!(err, HoursError::DateParse(ref d) if d == "June 14"));
    }

    #[test]
    fn test_default_span_keeps_first_start_and_last_seen_end() {
        let entries: Vec<DayEntry> = serde_json::from_value(serde_json::json!([
            {"date": "6/14", "sprint": "S1", "tasks": [{"person": "Alice", "hours": 1}]},
            {"date": "6/20", "sprint": "S1", "tasks": [{"person": "Alice", "hours": 1}]},
            {"date": "6/10", "sprint": "S1", "tasks": [{"person": "Alice", "hours": 1}]},
        ]))
        .unwrap();
        let chart = build_chart_data(&entries, &AnalysisOptions::default()).unwrap();

        assert_eq!(chart.spans[0].start, "6/14");
        assert_eq!(chart.spans[0].end, "6/10");
        assert_eq!(chart.metadata.span_end, SpanEndRule::LastSeen);
    }

    #[test]
    fn test_span_end_option_is_honoured() {
        let entries: Vec<DayEntry> = serde_json::from_value(serde_json::json!([
            {"date": "6/14", "sprint": "S1", "tasks": [{"person": "Alice", "hours": 1}]},
            {"date": "6/20", "sprint": "S1", "tasks": [{"person": "Alice", "hours": 1}]},
            {"date": "6/16", "sprint": "S1", "tasks": [{"person": "Alice", "hours": 1}]},
        ]))
        .unwrap();

        let last_seen = build_chart_data(&entries, &AnalysisOptions::default()).unwrap();
        assert_eq!(last_seen.spans[0].end, "6/16");

        let options = AnalysisOptions {
            span_end: SpanEndRule::Latest,
            ..AnalysisOptions::default()
        };
        let latest = build_chart_data(&entries, &options).unwrap();
        assert_eq!(latest.spans[0].end, "6/20");
    }

    #[test]
    fn test_analyze_hours_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            "{}",
            serde_json::to_string(&two_day_example()).unwrap()
        )
        .unwrap();

        let chart = analyze_hours(&path, &AnalysisOptions::default()).unwrap();

        assert_eq!(chart.series.len(), 2);
        assert_eq!(
            chart.metadata.source.as_deref(),
            Some(path.display().to_string().as_str())
        );
    }

    #[test]
    fn test_analyze_hours_missing_file() {
        let dir = TempDir::new().unwrap();
        let err =
            analyze_hours(&dir.path().join("nope.json"), &AnalysisOptions::default()).unwrap_err();
        assert!(matches!(err, HoursError::InputNotFound { .. }));
    }

    #[test]
    fn test_chart_data_serializes() {
        let chart = build_chart_data(&two_day_example(), &AnalysisOptions::default()).unwrap();
        let value = serde_json::to_value(&chart).unwrap();

        assert_eq!(value["max_hours"], 3.0);
        assert_eq!(value["series"][0]["person"], "Alice");
        assert_eq!(value["series"][0]["points"][0]["key"], "2024-06-14");
        assert_eq!(value["spans"][0]["sprint"], "S1");
        assert_eq!(value["metadata"]["span_end"], "last-seen");
    }

    #[test]
    fn test_totals_follow_series_order() {
        let chart = build_chart_data(&two_day_example(), &AnalysisOptions::default()).unwrap();
        let totals = chart.totals();
        assert_eq!(totals[0].person, "Alice");
        assert_eq!(totals[0].total_hours, 5.0);
        assert_eq!(totals[1].person, "Bob");
    }
}
