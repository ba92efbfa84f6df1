//! Sprint span tracking.
//!
//! Derives, per sprint label, the date strings that open and close the
//! sprint, then orders the spans by the chronological key of their start so
//! labels read left to right in calendar order.

use std::collections::HashMap;

use hours_core::date_key::{DateKey, DateKeyParser};
use hours_core::error::Result;
use hours_core::models::{DayEntry, SpanEndRule, SprintSpan};
use tracing::debug;

/// Accumulates sprint spans over a forward pass of day entries.
#[derive(Debug)]
pub struct SprintSpanTracker {
    rule: SpanEndRule,
    spans: Vec<SprintSpan>,
    by_sprint: HashMap<String, usize>,
}

impl SprintSpanTracker {
    pub fn new(rule: SpanEndRule) -> Self {
        Self {
            rule,
            spans: Vec::new(),
            by_sprint: HashMap::new(),
        }
    }

    /// Fold one entry (with its already-parsed date key) into its sprint span.
    ///
    /// The first entry of a sprint opens and closes the span. Later entries
    /// move the end according to the tracker's [`SpanEndRule`]; under
    /// [`SpanEndRule::Latest`] an earlier date also moves the start back.
    pub fn observe(&mut self, entry: &DayEntry, key: DateKey) {
        let Some(idx) = self.by_sprint.get(&entry.sprint).copied() else {
            self.by_sprint.insert(entry.sprint.clone(), self.spans.len());
            self.spans.push(SprintSpan {
                sprint: entry.sprint.clone(),
                start: entry.date.clone(),
                end: entry.date.clone(),
                start_key: key,
                end_key: key,
            });
            return;
        };

        let span = &mut self.spans[idx];
        match self.rule {
            SpanEndRule::LastSeen => {
                span.end = entry.date.clone();
                span.end_key = key;
            }
            SpanEndRule::Latest => {
                if key < span.start_key {
                    span.start = entry.date.clone();
                    span.start_key = key;
                }
                if key >= span.end_key {
                    span.end = entry.date.clone();
                    span.end_key = key;
                }
            }
        }
    }

    /// Spans sorted by the key of their start date.
    ///
    /// The sort is stable: sprints starting on the same day keep the order in
    /// which they were first seen.
    pub fn finish(self) -> Vec<SprintSpan> {
        let mut spans = self.spans;
        spans.sort_by_key(|s| s.start_key);
        spans
    }
}

/// Track every sprint's span over `entries`.
///
/// Any malformed date aborts the pass with [`hours_core::HoursError::DateParse`].
pub fn track_spans(
    entries: &[DayEntry],
    parser: &DateKeyParser,
    rule: SpanEndRule,
) -> Result<Vec<SprintSpan>> {
    let mut tracker = SprintSpanTracker::new(rule);
    for entry in entries {
        let key = parser.parse(&entry.date)?;
        tracker.observe(entry, key);
    }
    let spans = tracker.finish();
    debug!("Tracked {} sprint spans", spans.len());
    Ok(spans)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
