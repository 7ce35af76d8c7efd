use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::table::Table;
use crate::types::{ColumnKind, FileFormat, TabularFile};
use crate::utils::any_value_to_json;

/// A single preview row; one JSON value per column.
pub type PreviewRow = Vec<Value>;

/// What the UI shows for an uploaded file before any action is taken.
///
/// Serialized as JSON for the frontend. `preview` is row-major:
/// `preview[row][column]`, aligned with `columns`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileSummary {
    pub name: String,
    pub format: FileFormat,
    pub size_bytes: u64,
    /// Size in KB, rounded to 2 decimals.
    pub size_kb: f64,
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<String>,
    pub column_kinds: Vec<ColumnKind>,
    pub numeric_columns: Vec<String>,
    pub preview: Vec<PreviewRow>,
    pub has_missing: bool,
    pub missing_count: usize,
}

impl FileSummary {
    /// Summarize `table` as decoded from `file`, previewing the first
    /// `preview_rows` rows.
    pub fn build(
        file: &TabularFile,
        format: FileFormat,
        table: &Table,
        preview_rows: usize,
    ) -> Result<Self> {
        Ok(Self {
            name: file.name().to_string(),
            format,
            size_bytes: file.size_bytes(),
            size_kb: file.size_kb(),
            row_count: table.row_count(),
            column_count: table.column_count(),
            columns: table.column_names(),
            column_kinds: table.kinds().to_vec(),
            numeric_columns: table.numeric_columns(),
            preview: preview(table, preview_rows)?,
            has_missing: table.has_missing(),
            missing_count: table.missing_count(),
        })
    }

    /// Serialize to a JSON string for the frontend.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn preview(table: &Table, rows: usize) -> Result<Vec<PreviewRow>> {
    let head = table.head(rows);
    let columns = head.get_columns();

    (0..head.height())
        .map(|row_idx| {
            columns
                .iter()
                .map(|col| -> Result<Value> { Ok(any_value_to_json(col.get(row_idx)?)) })
                .collect()
        })
        .collect()
}
