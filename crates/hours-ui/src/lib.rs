//! Terminal UI layer for sprint hours.
//!
//! Provides themes, the header component, the per-person line chart with its
//! sprint label ribbon, the summary table, and the application event loop
//! built on top of [`ratatui`].

pub mod app;
pub mod chart_view;
pub mod components;
pub mod table_view;
pub mod themes;

pub use hours_core as core;
