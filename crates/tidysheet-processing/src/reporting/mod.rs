//! Reporting module for the display boundary.
//!
//! This module builds the serializable records the UI renders:
//! - [`FileSummary`]: name, size, preview rows and column lists for an upload
//! - [`ChartSeries`]: one numeric column's values for a bar chart

mod chart;
mod summary;

pub use chart::ChartSeries;
pub use summary::{FileSummary, PreviewRow};
