use serde::{Deserialize, Serialize};

use crate::date_key::DateKey;

/// One calendar day of logged work within a sprint, as read from the input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayEntry {
    /// Free-form `M/D` date string, e.g. `"6/14"`.
    pub date: String,
    /// Sprint label the day belongs to.
    pub sprint: String,
    /// Work logged on this day.
    pub tasks: Vec<TaskRecord>,
}

/// One logged unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// One name, or several joined by `/` (e.g. `"Alice/Bob"`).
    pub person: String,
    /// Hours spent. Every named contributor is credited the full value.
    pub hours: f64,
}

impl TaskRecord {
    /// The trimmed, non-empty contributor names in this record.
    pub fn contributors(&self) -> impl Iterator<Item = &str> {
        split_contributors(&self.person)
    }
}

/// Split a `/`-delimited contributor string into trimmed names.
///
/// Names that are empty after trimming (`"Alice/"`, `" / "`) are dropped
/// rather than credited to a blank person, so such a fragment never shows up
/// as a legend entry or table row.
pub fn split_contributors(person: &str) -> impl Iterator<Item = &str> {
    person
        .split('/')
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

/// Accumulated hours for one person on one date string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// The raw date string exactly as it appeared in the input.
    pub date: String,
    /// Chronological key of `date`.
    pub key: DateKey,
    /// Hours accumulated across every record for this date string.
    pub hours: f64,
    /// Sprint of the first entry that produced this point.
    pub sprint: String,
}

/// Per-person time series, ordered by chronological key once ingestion ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonSeries {
    pub person: String,
    pub points: Vec<SeriesPoint>,
}

impl PersonSeries {
    /// Sum of hours across every point.
    pub fn total_hours(&self) -> f64 {
        self.points.iter().map(|p| p.hours).sum()
    }

    /// Largest single-date value, `None` for a series without points.
    pub fn peak(&self) -> Option<&SeriesPoint> {
        self.points
            .iter()
            .max_by(|a, b| a.hours.total_cmp(&b.hours))
    }

    /// Point recorded for the exact date string `date`.
    pub fn point_for(&self, date: &str) -> Option<&SeriesPoint> {
        self.points.iter().find(|p| p.date == date)
    }
}

/// How a sprint's closing date is chosen as further entries arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpanEndRule {
    /// Take the date of the last entry in input order, whatever its key.
    /// The start stays at the sprint's first entry.
    #[default]
    LastSeen,
    /// Widen the span to the chronologically earliest and latest dates seen.
    Latest,
}

impl std::str::FromStr for SpanEndRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(Self::Latest),
            "last-seen" => Ok(Self::LastSeen),
            other => Err(format!("unknown span end rule: {other}")),
        }
    }
}

/// First and last observed dates of a sprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SprintSpan {
    pub sprint: String,
    /// Date string that opens the span.
    pub start: String,
    /// Date string that closes the span.
    pub end: String,
    pub start_key: DateKey,
    pub end_key: DateKey,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_key::DateKeyParser;

    fn point(date: &str, hours: f64) -> SeriesPoint {
        SeriesPoint {
            date: date.to_string(),
            key: DateKeyParser::default().parse(date).unwrap(),
            hours,
            sprint: "S1".to_string(),
        }
    }

    #[test]
    fn test_split_contributors_trims_names() {
        let names: Vec<&str> = split_contributors(" Alice / Bob ").collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_split_contributors_single_name() {
        let names: Vec<&str> = split_contributors("Carol").collect();
        assert_eq!(names, vec!["Carol"]);
    }

    #[test]
    fn test_split_contributors_drops_empty_names() {
        let names: Vec<&str> = split_contributors("Alice//Bob/ ").collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
        assert_eq!(split_contributors("").count(), 0);
    }

    #[test]
    fn test_day_entry_deserialize() {
        let json = r#"{"date":"6/14","sprint":"S1","tasks":[{"person":"Alice/Bob","hours":3}]}"#;
        let entry: DayEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.date, "6/14");
        assert_eq!(entry.sprint, "S1");
        assert_eq!(entry.tasks.len(), 1);
        assert_eq!(entry.tasks[0].hours, 3.0);
        let names: Vec<&str> = entry.tasks[0].contributors().collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_day_entry_requires_tasks() {
        let json = r#"{"date":"6/14","sprint":"S1"}"#;
        assert!(serde_json::from_str::<DayEntry>(json).is_err());
    }

    #[test]
    fn test_person_series_total_and_peak() {
        let series = PersonSeries {
            person: "Alice".to_string(),
            points: vec![point("6/14", 3.0), point("6/15", 5.5), point("6/16", 1.0)],
        };
        assert!((series.total_hours() - 9.5).abs() < 1e-9);
        assert_eq!(series.peak().unwrap().date, "6/15");
        assert_eq!(series.point_for("6/16").unwrap().hours, 1.0);
        assert!(series.point_for("06/16").is_none());
    }

    #[test]
    fn test_person_series_peak_empty() {
        let series = PersonSeries {
            person: "Nobody".to_string(),
            points: vec![],
        };
        assert!(series.peak().is_none());
        assert_eq!(series.total_hours(), 0.0);
    }

    #[test]
    fn test_span_end_rule_from_str() {
        assert_eq!("latest".parse::<SpanEndRule>(), Ok(SpanEndRule::Latest));
        assert_eq!("last-seen".parse::<SpanEndRule>(), Ok(SpanEndRule::LastSeen));
        assert!("newest".parse::<SpanEndRule>().is_err());
        assert_eq!(SpanEndRule::default(), SpanEndRule::LastSeen);
    }
}
