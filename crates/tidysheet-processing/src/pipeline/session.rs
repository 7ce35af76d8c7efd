//! Per-file session state.
//!
//! A [`FileSession`] owns one decoded upload and its working table. The UI
//! calls its handlers in response to user actions; each handler runs to
//! completion against the current table and touches nothing else.

use tracing::{debug, info};

use crate::cleaner::DataCleaner;
use crate::config::PipelineConfig;
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::Result;
use crate::imputers::StatisticalImputer;
use crate::reporting::{ChartSeries, FileSummary};
use crate::table::Table;
use crate::types::{CleaningReport, ExportBuffer, FileFormat, SessionStage, TabularFile};

/// Working state for one uploaded file.
///
/// # Example
///
/// ```rust,ignore
/// use tidysheet_processing::{FileFormat, FileSession, PipelineConfig, TabularFile};
///
/// let file = TabularFile::new("people.csv", "name,age\nAlice,30\nBob,\nAlice,30\n");
/// let mut session = FileSession::open(file, &PipelineConfig::default())?;
///
/// session.remove_duplicates()?;
/// session.fill_missing()?;
/// session.select_columns(&["age", "name"])?;
/// let download = session.export(FileFormat::Spreadsheet)?;
/// assert_eq!(download.file_name, "people.xlsx");
/// ```
#[derive(Debug, Clone)]
pub struct FileSession {
    file: TabularFile,
    format: FileFormat,
    config: PipelineConfig,
    table: Table,
    stage: SessionStage,
    history: Vec<String>,
}

// Sessions are handed between request handlers by a hosting server.
static_assertions::assert_impl_all!(FileSession: Send);

impl FileSession {
    /// Decode `file` and start a session on it.
    ///
    /// # Errors
    ///
    /// Same as [`Decoder::decode_file`]: the size limit first, then the
    /// format, then the content.
    pub fn open(file: TabularFile, config: &PipelineConfig) -> Result<Self> {
        Decoder::check_size(&file, config)?;
        let format = file.format()?;
        let table = Decoder::decode(file.name(), file.bytes(), format, config)?;
        let history = vec![format!(
            "Loaded {} rows x {} columns from {}",
            table.row_count(),
            table.column_count(),
            file.name()
        )];

        Ok(Self {
            file,
            format,
            config: config.clone(),
            table,
            stage: SessionStage::Decoded,
            history,
        })
    }

    pub fn name(&self) -> &str {
        self.file.name()
    }

    pub fn file(&self) -> &TabularFile {
        &self.file
    }

    /// Format the file was uploaded in.
    pub fn format(&self) -> FileFormat {
        self.format
    }

    /// The current working table, including every transform applied so far.
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// The most recent lifecycle step applied.
    pub fn stage(&self) -> SessionStage {
        self.stage
    }

    /// Human-readable log of the steps applied, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Display record for the current table.
    pub fn summary(&self) -> Result<FileSummary> {
        FileSummary::build(&self.file, self.format, &self.table, self.config.preview_rows)
    }

    /// Remove duplicate rows from the working table.
    pub fn remove_duplicates(&mut self) -> Result<CleaningReport> {
        let report = DataCleaner::remove_duplicates(&mut self.table)?;
        self.record(SessionStage::Cleaned, report.message());
        Ok(report)
    }

    /// Fill missing numeric cells with their column mean.
    pub fn fill_missing(&mut self) -> Result<CleaningReport> {
        let report = StatisticalImputer::fill_numeric_means(&mut self.table)?;
        self.record(SessionStage::Cleaned, report.message());
        Ok(report)
    }

    /// Keep only the named columns, in the given order.
    ///
    /// An empty selection leaves the table as it is. On error the table is
    /// unchanged.
    pub fn select_columns<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        if names.is_empty() {
            debug!("'{}': empty selection, keeping all columns", self.name());
            return Ok(());
        }

        self.table = self.table.select_columns(names)?;
        let message = format!("Kept columns: {}", self.table.column_names().join(", "));
        self.record(SessionStage::Projected, message);
        Ok(())
    }

    /// Values of a numeric column for the chart.
    pub fn chart_series(&self, column: &str) -> Result<ChartSeries> {
        ChartSeries::from_table(&self.table, column)
    }

    /// Encode the current table for download.
    pub fn export(&mut self, format: FileFormat) -> Result<ExportBuffer> {
        let buffer = Encoder::encode(&self.table, format, self.file.name(), &self.config)?;
        let message = format!("Converted {} to {}", self.file.name(), buffer.file_name);
        self.record(SessionStage::Exported, message);
        Ok(buffer)
    }

    fn record(&mut self, stage: SessionStage, message: String) {
        info!("'{}': {}", self.file.name(), message);
        self.stage = stage;
        self.history.push(message);
    }
}
