use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{PipelineError, Result};
use crate::utils::round_to;

// ============================================================================
// Uploaded Files
// ============================================================================

/// A file as received from the upload boundary: a name and its raw bytes.
///
/// Immutable once constructed. The format is derived from the extension of
/// the name, never from the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularFile {
    name: String,
    bytes: Vec<u8>,
}

impl TabularFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Size in kilobytes (1 KB = 1024 bytes), rounded to 2 decimals.
    pub fn size_kb(&self) -> f64 {
        round_to(self.bytes.len() as f64 / 1024.0, 2)
    }

    /// Detect the format from the file extension (case-insensitive).
    pub fn format(&self) -> Result<FileFormat> {
        FileFormat::from_file_name(&self.name)
    }
}

// ============================================================================
// File Formats
// ============================================================================

/// Tabular formats the pipeline can decode and encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// Comma-separated values.
    Csv,
    /// Office Open XML workbook (`.xlsx`), first sheet only.
    Spreadsheet,
}

impl FileFormat {
    /// MIME type used for the download boundary.
    pub fn mime_type(self) -> &'static str {
        match self {
            FileFormat::Csv => "text/csv",
            FileFormat::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    /// Canonical file extension, without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Spreadsheet => "xlsx",
        }
    }

    /// Detect the format from a file name's extension.
    ///
    /// Only `.csv` and `.xlsx` are accepted; anything else (including a
    /// missing extension) is an [`PipelineError::UnsupportedFormat`].
    pub fn from_file_name(name: &str) -> Result<Self> {
        let extension = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("csv") => Ok(FileFormat::Csv),
            Some("xlsx") => Ok(FileFormat::Spreadsheet),
            Some(other) => Err(PipelineError::UnsupportedFormat(format!(".{other}"))),
            None => Err(PipelineError::UnsupportedFormat(name.to_string())),
        }
    }
}

impl FromStr for FileFormat {
    type Err = PipelineError;

    /// Parse a format tag as the UI-collaborator would send it.
    fn from_str(tag: &str) -> Result<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(FileFormat::Csv),
            "spreadsheet" | "xlsx" | "excel" => Ok(FileFormat::Spreadsheet),
            _ => Err(PipelineError::UnsupportedFormat(tag.to_string())),
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Csv => f.write_str("csv"),
            FileFormat::Spreadsheet => f.write_str("spreadsheet"),
        }
    }
}

// ============================================================================
// Column Kinds
// ============================================================================

/// Inferred kind of a column, computed from its data type.
///
/// Only [`ColumnKind::Numeric`] takes part in fill-missing and charting.
/// Booleans are deliberately not numeric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Integer or floating point numbers
    Numeric,
    /// Boolean values
    Boolean,
    /// Date, datetime, time or duration
    Datetime,
    /// Strings and categoricals
    Text,
    /// Anything else (nested, binary, all-null)
    Other,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        self == ColumnKind::Numeric
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Datetime => "datetime",
            ColumnKind::Text => "text",
            ColumnKind::Other => "other",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Session State
// ============================================================================

/// Where a file is in its lifecycle.
///
/// `Uploaded` is not represented: a session only exists once decoding
/// succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStage {
    Decoded,
    Cleaned,
    Projected,
    Exported,
}

/// Which cleaning operation produced a [`CleaningReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningAction {
    RemoveDuplicates,
    FillMissing,
}

/// Outcome of one cleaning call, for display to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningReport {
    pub action: CleaningAction,
    pub rows_before: usize,
    pub rows_after: usize,
    /// Number of missing cells replaced by fill-missing.
    pub cells_filled: usize,
    /// Numeric columns that had missing values replaced.
    pub columns_filled: Vec<String>,
    /// Numeric columns with no present values, left unchanged.
    pub columns_skipped: Vec<String>,
}

impl CleaningReport {
    pub fn rows_removed(&self) -> usize {
        self.rows_before.saturating_sub(self.rows_after)
    }

    /// Human-readable one-line summary.
    pub fn message(&self) -> String {
        match self.action {
            CleaningAction::RemoveDuplicates => match self.rows_removed() {
                0 => "No duplicate rows found".to_string(),
                1 => "Removed 1 duplicate row".to_string(),
                n => format!("Removed {n} duplicate rows"),
            },
            CleaningAction::FillMissing if self.cells_filled == 0 => {
                "No missing numeric values to fill".to_string()
            }
            CleaningAction::FillMissing => format!(
                "Filled {} missing values in {} with the column mean",
                self.cells_filled,
                self.columns_filled.join(", ")
            ),
        }
    }
}

// ============================================================================
// Export
// ============================================================================

/// Encoded table ready for the download boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBuffer {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportBuffer {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_file_name() {
        assert_eq!(FileFormat::from_file_name("a.csv").unwrap(), FileFormat::Csv);
        assert_eq!(
            FileFormat::from_file_name("Report.XLSX").unwrap(),
            FileFormat::Spreadsheet
        );
        assert!(matches!(
            FileFormat::from_file_name("notes.txt"),
            Err(PipelineError::UnsupportedFormat(ext)) if ext == ".txt"
        ));
        assert!(matches!(
            FileFormat::from_file_name("README"),
            Err(PipelineError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_format_from_tag() {
        assert_eq!("csv".parse::<FileFormat>().unwrap(), FileFormat::Csv);
        assert_eq!(
            "Spreadsheet".parse::<FileFormat>().unwrap(),
            FileFormat::Spreadsheet
        );
        assert_eq!("xlsx".parse::<FileFormat>().unwrap(), FileFormat::Spreadsheet);
        assert!("parquet".parse::<FileFormat>().is_err());
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(FileFormat::Csv.mime_type(), "text/csv");
        assert_eq!(
            FileFormat::Spreadsheet.mime_type(),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
    }

    #[test]
    fn test_size_kb_rounding() {
        let file = TabularFile::new("a.csv", vec![0u8; 1500]);
        assert_eq!(file.size_bytes(), 1500);
        assert_eq!(file.size_kb(), 1.46);
    }

    #[test]
    fn test_cleaning_report_messages() {
        let report = CleaningReport {
            action: CleaningAction::RemoveDuplicates,
            rows_before: 3,
            rows_after: 2,
            cells_filled: 0,
            columns_filled: vec![],
            columns_skipped: vec![],
        };
        assert_eq!(report.rows_removed(), 1);
        assert_eq!(report.message(), "Removed 1 duplicate row");

        let report = CleaningReport {
            action: CleaningAction::FillMissing,
            rows_before: 2,
            rows_after: 2,
            cells_filled: 1,
            columns_filled: vec!["age".to_string()],
            columns_skipped: vec![],
        };
        assert_eq!(
            report.message(),
            "Filled 1 missing values in age with the column mean"
        );
    }
}
