//! Tabular File Conversion & Cleaning Library
//!
//! Decode uploaded CSV and XLSX files into an in-memory table, apply simple
//! user-triggered cleaning, keep a subset of columns, and encode the result
//! back to either format. Built with Rust and Polars.
//!
//! # Overview
//!
//! - **Decoding**: CSV with type inference, XLSX (first sheet only)
//! - **Cleaning**: Duplicate row removal, mean fill for numeric columns
//! - **Projection**: Keep and reorder a chosen set of columns
//! - **Summaries**: File info, preview rows and numeric chart series as JSON
//! - **Encoding**: CSV or XLSX download named after the source file
//!
//! Every operation is scoped to a single file. A batch upload decodes each
//! file independently, so one bad file never blocks the rest.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tidysheet_processing::{FileFormat, PipelineConfig, TabularFile, Workspace};
//!
//! let mut workspace = Workspace::new(PipelineConfig::default());
//!
//! let outcomes = workspace.ingest(vec![
//!     TabularFile::new("people.csv", std::fs::read("people.csv")?),
//!     TabularFile::new("notes.txt", b"not a table".to_vec()),
//! ]);
//! for outcome in &outcomes {
//!     match &outcome.result {
//!         Ok(summary) => println!("{}: {} rows", outcome.file_name, summary.row_count),
//!         Err(e) => println!("{}: {}", outcome.file_name, e),
//!     }
//! }
//!
//! let session = workspace.session_mut("people.csv")?;
//! session.remove_duplicates()?;
//! session.fill_missing()?;
//! session.select_columns(&["name", "age"])?;
//!
//! let download = session.export(FileFormat::Spreadsheet)?;
//! std::fs::write(&download.file_name, &download.bytes)?;
//! ```
//!
//! # Configuration
//!
//! Use [`PipelineConfig`] to customize decoding and display:
//!
//! ```rust,ignore
//! use tidysheet_processing::PipelineConfig;
//!
//! let config = PipelineConfig::builder()
//!     .preview_rows(10)
//!     .csv_separator(b';')
//!     .sheet_name("Cleaned")
//!     .max_upload_bytes(50 * 1024 * 1024)
//!     .build()?;
//! ```

pub mod cleaner;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod imputers;
pub mod pipeline;
pub mod reporting;
pub mod table;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::DataCleaner;
pub use config::{ConfigValidationError, DEFAULT_NA_VALUES, PipelineConfig, PipelineConfigBuilder};
pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{PipelineError, Result as PipelineResult, ResultExt};
pub use imputers::StatisticalImputer;
pub use pipeline::{FileSession, IngestOutcome, Workspace};
pub use reporting::{ChartSeries, FileSummary, PreviewRow};
pub use table::Table;
pub use types::{
    CleaningAction, CleaningReport, ColumnKind, ExportBuffer, FileFormat, SessionStage,
    TabularFile,
};
pub use utils::{
    any_value_to_json, column_kind, count_missing, fill_numeric_nulls, is_numeric_dtype,
    nan_to_null,
};
