//! Decoding uploaded bytes into a [`Table`].
//!
//! Supported formats:
//! - CSV (header row, polars type inference)
//! - XLSX (first sheet only)

mod csv;
mod spreadsheet;

use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::table::Table;
use crate::types::{FileFormat, TabularFile};

/// Decoder for uploaded tabular files.
pub struct Decoder;

impl Decoder {
    /// Decode an uploaded file, detecting its format from the extension.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::FileTooLarge`] if the upload exceeds
    ///   `config.max_upload_bytes`
    /// - [`PipelineError::UnsupportedFormat`] for anything but `.csv`/`.xlsx`
    /// - [`PipelineError::Decode`] if the content does not parse
    pub fn decode_file(file: &TabularFile, config: &PipelineConfig) -> Result<Table> {
        Self::check_size(file, config)?;
        let format = file.format()?;
        Self::decode(file.name(), file.bytes(), format, config)
    }

    /// Reject an upload larger than `config.max_upload_bytes`.
    ///
    /// Runs before format detection, so an oversized file is always reported
    /// as [`PipelineError::FileTooLarge`].
    pub fn check_size(file: &TabularFile, config: &PipelineConfig) -> Result<()> {
        if let Some(limit) = config.max_upload_bytes
            && file.size_bytes() > limit
        {
            return Err(PipelineError::FileTooLarge {
                file: file.name().to_string(),
                size: file.size_bytes(),
                limit,
            });
        }
        Ok(())
    }

    /// Decode bytes given a textual format tag (`csv`, `spreadsheet`, `xlsx`).
    pub fn decode_tagged(
        name: &str,
        bytes: &[u8],
        tag: &str,
        config: &PipelineConfig,
    ) -> Result<Table> {
        let format: FileFormat = tag.parse()?;
        Self::decode(name, bytes, format, config)
    }

    /// Decode bytes in a known format. `name` is only used in error messages.
    pub fn decode(
        name: &str,
        bytes: &[u8],
        format: FileFormat,
        config: &PipelineConfig,
    ) -> Result<Table> {
        debug!("Decoding '{}' as {} ({} bytes)", name, format, bytes.len());

        let df = match format {
            FileFormat::Csv => csv::read_csv(name, bytes, config)?,
            FileFormat::Spreadsheet => spreadsheet::read_xlsx(name, bytes, &config.na_values)?,
        };

        info!(
            "Decoded '{}': {} rows x {} columns",
            name,
            df.height(),
            df.width()
        );
        Ok(Table::new(df))
    }
}
