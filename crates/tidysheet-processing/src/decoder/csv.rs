//! CSV decoding via polars.

use polars::prelude::*;
use std::io::Cursor;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Reads CSV bytes into a DataFrame.
///
/// The first row is the header. Empty fields and fields exactly matching one
/// of `config.na_values` become missing values, before type inference, so a
/// numeric column with an `NA` cell stays numeric. Rows with more fields than
/// the header are rejected.
pub(crate) fn read_csv(name: &str, bytes: &[u8], config: &PipelineConfig) -> Result<DataFrame> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(PipelineError::decode(name, "file is empty"));
    }

    let null_values = (!config.na_values.is_empty()).then(|| {
        NullValues::AllColumns(config.na_values.iter().map(|v| v.as_str().into()).collect())
    });
    let parse_options = CsvParseOptions::default()
        .with_separator(config.csv_separator)
        .with_null_values(null_values);

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(config.infer_schema_length)
        .with_parse_options(parse_options)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|e| PipelineError::decode(name, e))
}
