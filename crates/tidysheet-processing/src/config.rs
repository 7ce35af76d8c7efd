//! Configuration types for the tabular pipeline.
//!
//! Configuration lives in memory only; the hosting application decides where
//! the values come from. Use the builder for validated construction.

use serde::{Deserialize, Serialize};

/// Excel limits sheet names to 31 characters.
const MAX_SHEET_NAME_LEN: usize = 31;

/// Characters Excel rejects in sheet names.
const FORBIDDEN_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Cell text read as missing in addition to empty cells.
///
/// Matches the token list spreadsheet users get from pandas by default.
pub const DEFAULT_NA_VALUES: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Configuration for decoding, previewing and encoding tables.
///
/// Use [`PipelineConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use tidysheet_processing::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .preview_rows(10)
///     .csv_separator(b';')
///     .max_upload_bytes(20 * 1024 * 1024)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Number of leading rows included in a file summary preview.
    /// Default: 5
    pub preview_rows: usize,

    /// Number of CSV rows sampled for type inference.
    /// `None` scans the whole file.
    /// Default: None
    pub infer_schema_length: Option<usize>,

    /// Field separator for reading CSV uploads.
    /// Default: b','
    pub csv_separator: u8,

    /// Name of the single worksheet written on spreadsheet export.
    /// Default: "Sheet1"
    pub sheet_name: String,

    /// Reject uploads larger than this many bytes before decoding.
    /// Default: None (no limit)
    pub max_upload_bytes: Option<u64>,

    /// Exact cell texts decoded as missing values. Empty cells are always
    /// missing.
    /// Default: [`DEFAULT_NA_VALUES`]
    #[serde(default = "default_na_values")]
    pub na_values: Vec<String>,
}

fn default_na_values() -> Vec<String> {
    DEFAULT_NA_VALUES.iter().map(|s| s.to_string()).collect()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            infer_schema_length: None,
            csv_separator: b',',
            sheet_name: "Sheet1".to_string(),
            max_upload_bytes: None,
            na_values: default_na_values(),
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.preview_rows == 0 {
            return Err(ConfigValidationError::InvalidPreviewRows(self.preview_rows));
        }

        if self.infer_schema_length == Some(0) {
            return Err(ConfigValidationError::InvalidInferSchemaLength);
        }

        let sep = self.csv_separator;
        if !sep.is_ascii() || matches!(sep, b'"' | b'\r' | b'\n') {
            return Err(ConfigValidationError::InvalidSeparator(sep));
        }

        let name = &self.sheet_name;
        if name.is_empty()
            || name.chars().count() > MAX_SHEET_NAME_LEN
            || name.contains(FORBIDDEN_SHEET_CHARS)
        {
            return Err(ConfigValidationError::InvalidSheetName(name.clone()));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid preview rows: {0} (must be at least 1)")]
    InvalidPreviewRows(usize),

    #[error("Invalid schema inference length: must be at least 1 row, or unset to scan all rows")]
    InvalidInferSchemaLength,

    #[error("Invalid CSV separator byte: {0:#04x}")]
    InvalidSeparator(u8),

    #[error(
        "Invalid sheet name '{0}': must be 1-31 characters without any of [ ] : * ? / \\"
    )]
    InvalidSheetName(String),
}

/// Builder for [`PipelineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    preview_rows: Option<usize>,
    infer_schema_length: Option<usize>,
    csv_separator: Option<u8>,
    sheet_name: Option<String>,
    max_upload_bytes: Option<u64>,
    na_values: Option<Vec<String>>,
}

impl PipelineConfigBuilder {
    /// Set how many rows the file summary preview shows.
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = Some(rows);
        self
    }

    /// Limit CSV type inference to the first `rows` rows.
    ///
    /// Leave unset to scan the whole file, which is slower but never fails
    /// on a late value of a different type.
    pub fn infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = Some(rows);
        self
    }

    /// Set the CSV field separator.
    pub fn csv_separator(mut self, separator: u8) -> Self {
        self.csv_separator = Some(separator);
        self
    }

    /// Set the worksheet name used when exporting to a spreadsheet.
    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = Some(name.into());
        self
    }

    /// Reject uploads larger than `bytes`.
    pub fn max_upload_bytes(mut self, bytes: u64) -> Self {
        self.max_upload_bytes = Some(bytes);
        self
    }

    /// Replace the tokens read as missing. Pass an empty list to treat only
    /// empty cells as missing.
    pub fn na_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.na_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PipelineConfig` or an error if validation fails.
    pub fn build(self) -> Result<PipelineConfig, ConfigValidationError> {
        let defaults = PipelineConfig::default();
        let config = PipelineConfig {
            preview_rows: self.preview_rows.unwrap_or(defaults.preview_rows),
            infer_schema_length: self.infer_schema_length.or(defaults.infer_schema_length),
            csv_separator: self.csv_separator.unwrap_or(defaults.csv_separator),
            sheet_name: self.sheet_name.unwrap_or(defaults.sheet_name),
            max_upload_bytes: self.max_upload_bytes.or(defaults.max_upload_bytes),
            na_values: self.na_values.unwrap_or(defaults.na_values),
        };

        config.validate()?;
        Ok(config)
    }
}
