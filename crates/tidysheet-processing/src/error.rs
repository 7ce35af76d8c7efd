//! Custom error types for the tabular pipeline.
//!
//! This module provides the error hierarchy using `thiserror`. Every error is
//! local to the file or operation that raised it; none of them invalidates the
//! rest of an upload session.
//!
//! Errors are serializable so a hosting UI can show them to the user
//! without needing to know the Rust types.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

use crate::config::ConfigValidationError;
use crate::types::ColumnKind;

/// The main error type for the tabular pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The file extension or format tag is not one we can read or write.
    #[error("Unsupported file type '{0}': expected a CSV or Excel (.xlsx) file")]
    UnsupportedFormat(String),

    /// The bytes do not parse as the claimed format.
    #[error("Failed to decode '{file}': {reason}")]
    Decode { file: String, reason: String },

    /// Column was not found in the table.
    #[error("Column '{0}' not found in table")]
    ColumnNotFound(String),

    /// Operation requires a numeric column.
    #[error("Column '{column}' is not numeric (found {kind})")]
    NotNumeric { column: String, kind: ColumnKind },

    /// Serialization to the export format could not complete.
    #[error("Failed to encode table: {0}")]
    Encode(String),

    /// The upload exceeds the configured size limit.
    #[error("File '{file}' is {size} bytes, larger than the {limit} byte limit")]
    FileTooLarge { file: String, size: u64, limit: u64 },

    /// No session exists for the given file name.
    #[error("No uploaded file named '{0}'")]
    UnknownFile(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<PipelineError>,
    },
}

impl PipelineError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        PipelineError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Shorthand for a [`PipelineError::Decode`] on the named file.
    pub fn decode(file: impl Into<String>, reason: impl ToString) -> Self {
        PipelineError::Decode {
            file: file.into(),
            reason: reason.to_string(),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::Decode { .. } => "DECODE_ERROR",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::NotNumeric { .. } => "NOT_NUMERIC",
            Self::Encode(_) => "ENCODE_ERROR",
            Self::FileTooLarge { .. } => "FILE_TOO_LARGE",
            Self::UnknownFile(_) => "UNKNOWN_FILE",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error was caused by what the user picked (file, column,
    /// format) rather than by a failure inside the pipeline.
    pub fn is_user_error(&self) -> bool {
        match self {
            Self::UnsupportedFormat(_)
            | Self::Decode { .. }
            | Self::ColumnNotFound(_)
            | Self::NotNumeric { .. }
            | Self::FileTooLarge { .. }
            | Self::UnknownFile(_) => true,
            Self::WithContext { source, .. } => source.is_user_error(),
            _ => false,
        }
    }
}

impl From<ConfigValidationError> for PipelineError {
    fn from(err: ConfigValidationError) -> Self {
        PipelineError::InvalidConfig(err.to_string())
    }
}

/// Errors are serialized as a struct with `code` and `message` fields,
/// making them easy to handle in the frontend.
impl Serialize for PipelineError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("PipelineError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| PipelineError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            PipelineError::UnsupportedFormat(".txt".to_string()).error_code(),
            "UNSUPPORTED_FORMAT"
        );
        assert_eq!(
            PipelineError::ColumnNotFound("test".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
        assert_eq!(
            PipelineError::NotNumeric {
                column: "id".to_string(),
                kind: ColumnKind::Text,
            }
            .error_code(),
            "NOT_NUMERIC"
        );
    }

    #[test]
    fn test_is_user_error() {
        assert!(PipelineError::decode("a.csv", "bad row").is_user_error());
        assert!(PipelineError::UnknownFile("a.csv".to_string()).is_user_error());
        assert!(!PipelineError::Encode("boom".to_string()).is_user_error());
        assert!(
            PipelineError::ColumnNotFound("x".to_string())
                .with_context("During projection")
                .is_user_error()
        );
    }

    #[test]
    fn test_error_serialization() {
        let error = PipelineError::ColumnNotFound("Age".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("Age"));
    }

    #[test]
    fn test_not_numeric_message_names_kind() {
        let error = PipelineError::NotNumeric {
            column: "id".to_string(),
            kind: ColumnKind::Text,
        };
        assert_eq!(error.to_string(), "Column 'id' is not numeric (found text)");
    }

    #[test]
    fn test_with_context() {
        let error =
            PipelineError::ColumnNotFound("test".to_string()).with_context("During projection");
        assert!(error.to_string().contains("During projection"));
        assert_eq!(error.error_code(), "COLUMN_NOT_FOUND");
    }
}
