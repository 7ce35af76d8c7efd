//! CSV encoding via polars.

use polars::prelude::*;

use crate::error::{PipelineError, Result};

/// Writes a DataFrame as CSV: header row, no index column, missing values as
/// empty fields.
pub(crate) fn write_csv(df: &DataFrame) -> Result<Vec<u8>> {
    let mut df = df.clone();
    let mut buffer = Vec::new();

    CsvWriter::new(&mut buffer)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut df)
        .map_err(|e| PipelineError::Encode(e.to_string()))?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_header_and_empty_missing() {
        let df = df!(
            "name" => ["Alice", "Bob"],
            "age" => [Some(30i64), None]
        )
        .unwrap();

        let bytes = write_csv(&df).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "name,age\nAlice,30\nBob,\n");
    }

    #[test]
    fn test_quotes_fields_with_separator() {
        let df = df!("city" => ["Paris, FR"]).unwrap();
        let bytes = write_csv(&df).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "city\n\"Paris, FR\"\n");
    }
}
