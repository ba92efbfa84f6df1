//! Data layer for sprint hours charting.
//!
//! Reads the day-entry JSON document, aggregates hours per person per date,
//! tracks sprint spans, and packages everything as chart data.

pub mod aggregator;
pub mod analysis;
pub mod reader;
pub mod spans;

pub use hours_core as core;
