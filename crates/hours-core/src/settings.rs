use clap::Parser;
use std::path::PathBuf;

use crate::date_key::DEFAULT_YEAR;
use crate::models::SpanEndRule;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Hours worked per person over time, by sprint
///
/// Every flag is optional; running with no arguments reads `data.json` from
/// the working directory and opens the chart.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sprint-hours",
    about = "Hours worked per person over time, by sprint",
    version
)]
pub struct Settings {
    /// JSON file holding the array of day entries
    #[arg(long, default_value = "data.json")]
    pub data_file: PathBuf,

    /// Year assumed for every M/D date
    #[arg(long, default_value_t = DEFAULT_YEAR, value_parser = clap::value_parser!(i32).range(1970..=9999))]
    pub year: i32,

    /// How a sprint's end date is chosen
    #[arg(long, default_value = "last-seen", value_parser = ["last-seen", "latest"])]
    pub span_end: String,

    /// View mode
    #[arg(long, default_value = "chart", value_parser = ["chart", "table", "json"])]
    pub view: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Log file path (stderr when absent)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] but with an explicit argument list, so tests
    /// can drive it without spawning a process.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);

        // --debug overrides log level.
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        settings
    }

    /// The span end rule named by `--span-end`.
    ///
    /// clap has already restricted the value, so an unknown string can only
    /// come from a hand-built `Settings`; it falls back to the default rule.
    pub fn span_end_rule(&self) -> SpanEndRule {
        self.span_end.parse().unwrap_or_default()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
