//! Encoding a [`Table`] into a downloadable [`ExportBuffer`].

mod csv;
mod spreadsheet;

use tracing::info;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::table::Table;
use crate::types::{ExportBuffer, FileFormat};
use crate::utils::output_file_name;

/// Encoder for table exports.
pub struct Encoder;

impl Encoder {
    /// Encode `table` in `format`, naming the output after `source_name`
    /// with its extension swapped.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PipelineError::Encode`] if a cell cannot be
    /// represented in the target format or the writer fails.
    pub fn encode(
        table: &Table,
        format: FileFormat,
        source_name: &str,
        config: &PipelineConfig,
    ) -> Result<ExportBuffer> {
        let bytes = match format {
            FileFormat::Csv => csv::write_csv(table.data_frame())?,
            FileFormat::Spreadsheet => {
                spreadsheet::write_xlsx(table.data_frame(), &config.sheet_name)?
            }
        };

        let file_name = output_file_name(source_name, format);
        info!(
            "Encoded {} rows x {} columns as {} ({} bytes)",
            table.row_count(),
            table.column_count(),
            file_name,
            bytes.len()
        );

        Ok(ExportBuffer {
            file_name,
            mime_type: format.mime_type(),
            bytes,
        })
    }

    /// Same as [`Encoder::encode`] with a textual format tag.
    pub fn encode_tagged(
        table: &Table,
        tag: &str,
        source_name: &str,
        config: &PipelineConfig,
    ) -> Result<ExportBuffer> {
        let format: FileFormat = tag.parse()?;
        Self::encode(table, format, source_name, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn table() -> Table {
        Table::new(df!("id" => ["a", "b"], "score" => [1i64, 2]).unwrap())
    }

    #[test]
    fn test_csv_export_metadata() {
        let buffer = Encoder::encode(
            &table(),
            FileFormat::Csv,
            "report.xlsx",
            &PipelineConfig::default(),
        )
        .unwrap();

        assert_eq!(buffer.file_name, "report.csv");
        assert_eq!(buffer.mime_type, "text/csv");
        assert_eq!(buffer.bytes, b"id,score\na,1\nb,2\n");
    }

    #[test]
    fn test_spreadsheet_export_metadata() {
        let buffer = Encoder::encode_tagged(
            &table(),
            "spreadsheet",
            "data.csv",
            &PipelineConfig::default(),
        )
        .unwrap();

        assert_eq!(buffer.file_name, "data.xlsx");
        assert_eq!(
            buffer.mime_type,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert!(!buffer.is_empty());
    }
}
