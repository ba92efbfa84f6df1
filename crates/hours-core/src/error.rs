use std::path::PathBuf;
use thiserror::Error;

/// All errors produced while building the sprint hours chart.
#[derive(Error, Debug)]
pub enum HoursError {
    /// The input data file could not be opened.
    #[error("Failed to open data file {path}: {source}")]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input file is not a valid JSON array of day entries.
    #[error("Malformed JSON in {path}: {source}")]
    MalformedJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A date string did not match the numeric `M/D` shape.
    #[error("Invalid date format: {0}")]
    DateParse(String),

    /// No hours were recorded for anyone, so the vertical axis has no scale.
    #[error("No hours recorded for any person")]
    EmptyData,

    /// Pass-through for terminal and other I/O errors that carry no path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the sprint hours crates.
pub type Result<T> = std::result::Result<T, HoursError>;
