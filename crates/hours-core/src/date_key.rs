use std::fmt;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{HoursError, Result};

/// Year appended to `M/D` strings when none is configured.
///
/// A leap year, so `"2/29"` is a valid entry date.
pub const DEFAULT_YEAR: i32 = 2024;

// ── DateKey ───────────────────────────────────────────────────────────────────

/// Chronologically comparable value derived from a raw `M/D` date string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// The calendar date behind the key.
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Whole days from `origin` to `self` (negative when `self` is earlier).
    pub fn days_since(&self, origin: DateKey) -> i64 {
        (self.0 - origin.0).num_days()
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

// ── DateKeyParser ─────────────────────────────────────────────────────────────

fn month_day_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\s*(\d{1,2})/(\d{1,2})\s*$").expect("regex is valid"))
}

/// Turns `M/D` date strings into [`DateKey`]s under a fixed assumed year.
///
/// Year wrap is not handled: with the same assumed year `"1/2"` sorts before
/// `"12/30"`.
#[derive(Debug, Clone, Copy)]
pub struct DateKeyParser {
    year: i32,
}

impl Default for DateKeyParser {
    fn default() -> Self {
        Self::new(DEFAULT_YEAR)
    }
}

impl DateKeyParser {
    pub fn new(year: i32) -> Self {
        Self { year }
    }

    /// The year appended to every parsed date.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Parse `raw` as month/day in the assumed year.
    ///
    /// Surrounding whitespace is ignored. Anything that is not one or two
    /// digits, a `/`, then one or two digits fails with
    /// [`HoursError::DateParse`], as does an impossible calendar date such as
    /// `"2/30"`.
    pub fn parse(&self, raw: &str) -> Result<DateKey> {
        let caps = month_day_pattern().captures(raw).ok_or_else(|| {
            debug!("DateKeyParser: \"{}\" is not M/D", raw);
            HoursError::DateParse(raw.to_string())
        })?;

        let month: u32 = caps[1]
            .parse()
            .map_err(|_| HoursError::DateParse(raw.to_string()))?;
        let day: u32 = caps[2]
            .parse()
            .map_err(|_| HoursError::DateParse(raw.to_string()))?;

        NaiveDate::from_ymd_opt(self.year, month, day)
            .map(DateKey)
            .ok_or_else(|| {
                debug!(
                    "DateKeyParser: \"{}\" is not a calendar date in {}",
                    raw, self.year
                );
                HoursError::DateParse(raw.to_string())
            })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
