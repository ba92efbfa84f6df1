//! Loading of the day-entry JSON document.
//!
//! The input is a single JSON array of [`DayEntry`] objects, read wholesale
//! into memory. The file handle lives only for the duration of the parse.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use hours_core::error::{HoursError, Result};
use hours_core::models::DayEntry;
use tracing::debug;

/// Read and parse the day entries stored at `path`.
///
/// * The file cannot be opened → [`HoursError::InputNotFound`].
/// * The content is not JSON, or not an array of well-formed day entries →
///   [`HoursError::MalformedJson`].
pub fn load_day_entries(path: &Path) -> Result<Vec<DayEntry>> {
    let file = File::open(path).map_err(|source| HoursError::InputNotFound {
        path: path.to_path_buf(),
        source,
    })?;

    let entries: Vec<DayEntry> =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            HoursError::MalformedJson {
                path: path.to_path_buf(),
                source,
            }
        })?;

    debug!("Loaded {} day entries from {}", entries.len(), path.display());

    Ok(entries)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
