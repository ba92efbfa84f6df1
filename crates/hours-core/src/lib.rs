//! Shared types for sprint hours charting.
//!
//! Holds the input data model, chronological date keys, the error taxonomy,
//! command-line settings and number formatting used by the data and UI crates.

pub mod date_key;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{HoursError, Result};
