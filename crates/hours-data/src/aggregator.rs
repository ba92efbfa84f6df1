//! Per-person hours aggregation over day entries.
//!
//! Every contributor named in a task record is credited the record's full
//! hours, and hours for the same person and date string accumulate into one
//! point.

use std::collections::{BTreeMap, HashMap};

use hours_core::date_key::{DateKey, DateKeyParser};
use hours_core::error::{HoursError, Result};
use hours_core::formatting::percentage;
use hours_core::models::{DayEntry, PersonSeries, SeriesPoint};
use serde::Serialize;
use tracing::debug;

// ── PersonAccumulator ─────────────────────────────────────────────────────────

/// Points for one person in first-seen order, plus a date string → index map
/// used to decide between appending and accumulating.
#[derive(Debug, Default)]
struct PersonAccumulator {
    points: Vec<SeriesPoint>,
    by_date: HashMap<String, usize>,
}

impl PersonAccumulator {
    fn add(&mut self, date: &str, key: DateKey, hours: f64, sprint: &str) {
        match self.by_date.get(date) {
            Some(&idx) => self.points[idx].hours += hours,
            None => {
                self.by_date.insert(date.to_string(), self.points.len());
                self.points.push(SeriesPoint {
                    date: date.to_string(),
                    key,
                    hours,
                    sprint: sprint.to_string(),
                });
            }
        }
    }

    /// Stable sort, so distinct strings for the same day keep input order.
    fn finish(self, person: String) -> PersonSeries {
        let mut points = self.points;
        points.sort_by_key(|p| p.key);
        PersonSeries { person, points }
    }
}

// ── IngestStats ───────────────────────────────────────────────────────────────

/// Counters gathered while ingesting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    /// Day entries observed.
    pub entries: usize,
    /// Task records observed across all entries.
    pub task_records: usize,
    /// Person credits made; a record naming two people counts twice.
    pub contributions: usize,
}

// ── SeriesBuilder ─────────────────────────────────────────────────────────────

/// Incremental form of [`HoursAggregator::ingest`].
///
/// Callers that already parsed an entry's date (the analysis pipeline parses
/// once and feeds both this builder and the span tracker) use
/// [`SeriesBuilder::observe`] directly.
#[derive(Debug, Default)]
pub struct SeriesBuilder {
    people: HashMap<String, PersonAccumulator>,
    stats: IngestStats,
}

impl SeriesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit every contributor of every task in `entry`.
    pub fn observe(&mut self, entry: &DayEntry, key: DateKey) {
        self.stats.entries += 1;
        for task in &entry.tasks {
            self.stats.task_records += 1;
            for name in task.contributors() {
                self.stats.contributions += 1;
                self.people
                    .entry(name.to_string())
                    .or_default()
                    .add(&entry.date, key, task.hours, &entry.sprint);
            }
        }
    }

    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }

    /// Close the pass: sort each person's points by chronological key.
    ///
    /// Persons come back keyed by name, so legend colours and table rows
    /// follow alphabetical order, not the order names first appear in the
    /// input.
    pub fn finish(self) -> (BTreeMap<String, PersonSeries>, IngestStats) {
        let series = self
            .people
            .into_iter()
            .map(|(person, acc)| (person.clone(), acc.finish(person)))
            .collect();
        (series, self.stats)
    }
}

// ── PersonTotals ──────────────────────────────────────────────────────────────

/// Summary of one person's series for the table view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonTotals {
    pub person: String,
    pub total_hours: f64,
    /// Number of distinct date strings with logged hours.
    pub active_days: usize,
    pub peak_date: String,
    pub peak_hours: f64,
    /// Sprints worked in, in chronological order of first appearance.
    pub sprints: Vec<String>,
    /// Share of everyone's hours, in percent with one decimal.
    pub share_pct: f64,
}

// ── HoursAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that turns day entries into per-person series.
pub struct HoursAggregator;

impl HoursAggregator {
    /// Build the per-person series for `entries`.
    ///
    /// A date that fails to parse aborts the whole ingestion; no partial
    /// result is returned.
    pub fn ingest(
        entries: &[DayEntry],
        parser: &DateKeyParser,
    ) -> Result<BTreeMap<String, PersonSeries>> {
        Self::ingest_with_stats(entries, parser).map(|(series, _)| series)
    }

    /// [`HoursAggregator::ingest`], also returning the pass counters.
    pub fn ingest_with_stats(
        entries: &[DayEntry],
        parser: &DateKeyParser,
    ) -> Result<(BTreeMap<String, PersonSeries>, IngestStats)> {
        let mut builder = SeriesBuilder::new();
        for entry in entries {
            let key = parser.parse(&entry.date)?;
            builder.observe(entry, key);
        }
        let (series, stats) = builder.finish();
        debug!(
            "Ingested {} entries, {} task records into {} persons",
            stats.entries,
            stats.task_records,
            series.len()
        );
        Ok((series, stats))
    }

    /// Largest single-point hours value across every person.
    ///
    /// Fails with [`HoursError::EmptyData`] when there are no points at all,
    /// since the vertical axis would have no scale.
    pub fn max_hours<'a>(series: impl IntoIterator<Item = &'a PersonSeries>) -> Result<f64> {
        series
            .into_iter()
            .flat_map(|s| s.points.iter().map(|p| p.hours))
            .reduce(f64::max)
            .ok_or(HoursError::EmptyData)
    }

    /// Per-person summary rows, in the iteration order of `series`.
    pub fn person_totals<'a>(
        series: impl IntoIterator<Item = &'a PersonSeries>,
    ) -> Vec<PersonTotals> {
        let series: Vec<&PersonSeries> = series.into_iter().collect();
        let grand_total: f64 = series.iter().map(|s| s.total_hours()).sum();

        series
            .into_iter()
            .map(|s| {
                let total_hours = s.total_hours();
                let (peak_date, peak_hours) = s
                    .peak()
                    .map(|p| (p.date.clone(), p.hours))
                    .unwrap_or_default();

                let mut sprints: Vec<String> = Vec::new();
                for point in &s.points {
                    if !sprints.contains(&point.sprint) {
                        sprints.push(point.sprint.clone());
                    }
                }

                PersonTotals {
                    person: s.person.clone(),
                    total_hours,
                    active_days: s.points.len(),
                    peak_date,
                    peak_hours,
                    sprints,
                    share_pct: percentage(total_hours, grand_total, 1),
                }
            })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
