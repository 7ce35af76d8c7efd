//! XLSX encoding via rust_xlsxwriter.
//!
//! Writes a single worksheet: a bold header row followed by one row per table
//! row, without an index column.

use polars::prelude::*;
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, Worksheet, XlsxError};

use crate::error::{PipelineError, Result};

/// Excel's hard limit on rows per worksheet, header included.
const MAX_SHEET_ROWS: usize = 1_048_576;

/// Excel's hard limit on columns per worksheet.
const MAX_SHEET_COLUMNS: usize = 16_384;

/// Largest integer magnitude an Excel number (an f64) holds exactly.
const MAX_EXACT_INT: u64 = 1 << 53;

pub(crate) fn write_xlsx(df: &DataFrame, sheet_name: &str) -> Result<Vec<u8>> {
    if df.height() + 1 > MAX_SHEET_ROWS {
        return Err(PipelineError::Encode(format!(
            "{} rows do not fit in a worksheet (limit {})",
            df.height(),
            MAX_SHEET_ROWS - 1
        )));
    }
    if df.width() > MAX_SHEET_COLUMNS {
        return Err(PipelineError::Encode(format!(
            "{} columns do not fit in a worksheet (limit {MAX_SHEET_COLUMNS})",
            df.width()
        )));
    }

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name).map_err(xlsx_error)?;

    for (col_idx, column) in df.get_columns().iter().enumerate() {
        let col = ColNum::try_from(col_idx)
            .map_err(|_| PipelineError::Encode(format!("column index {col_idx} out of range")))?;

        worksheet
            .write_string_with_format(0, col, column.name().as_str(), &header_format)
            .map_err(xlsx_error)?;

        let series = column.as_materialized_series();
        for row_idx in 0..series.len() {
            let row = RowNum::try_from(row_idx + 1)
                .map_err(|_| PipelineError::Encode(format!("row index {row_idx} out of range")))?;
            let value = series.get(row_idx)?;
            write_cell(worksheet, row, col, value).map_err(|e| {
                e.with_context(format!("Column '{}', row {}", column.name(), row_idx))
            })?;
        }
    }

    workbook.save_to_buffer().map_err(xlsx_error)
}

/// Write one cell. Missing values and NaN leave the cell empty. Integers too
/// large for an exact Excel number are written as text.
fn write_cell(
    worksheet: &mut Worksheet,
    row: RowNum,
    col: ColNum,
    value: AnyValue<'_>,
) -> Result<()> {
    match value {
        AnyValue::Null => Ok(()),
        AnyValue::Boolean(b) => worksheet
            .write_boolean(row, col, b)
            .map(drop)
            .map_err(xlsx_error),

        AnyValue::Int8(i) => write_number(worksheet, row, col, f64::from(i)),
        AnyValue::Int16(i) => write_number(worksheet, row, col, f64::from(i)),
        AnyValue::Int32(i) => write_number(worksheet, row, col, f64::from(i)),
        AnyValue::Int64(i) if i.unsigned_abs() > MAX_EXACT_INT => {
            write_text(worksheet, row, col, &i.to_string())
        }
        AnyValue::Int64(i) => write_number(worksheet, row, col, i as f64),
        AnyValue::UInt8(u) => write_number(worksheet, row, col, f64::from(u)),
        AnyValue::UInt16(u) => write_number(worksheet, row, col, f64::from(u)),
        AnyValue::UInt32(u) => write_number(worksheet, row, col, f64::from(u)),
        AnyValue::UInt64(u) if u > MAX_EXACT_INT => write_text(worksheet, row, col, &u.to_string()),
        AnyValue::UInt64(u) => write_number(worksheet, row, col, u as f64),
        AnyValue::Float32(f) => write_number(worksheet, row, col, f64::from(f)),
        AnyValue::Float64(f) => write_number(worksheet, row, col, f),

        AnyValue::String(s) => write_text(worksheet, row, col, s),
        AnyValue::StringOwned(s) => write_text(worksheet, row, col, s.as_str()),

        other if other.dtype().is_temporal() => {
            write_text(worksheet, row, col, &other.to_string())
        }
        other => Err(PipelineError::Encode(format!(
            "unsupported cell value type {}",
            other.dtype()
        ))),
    }
}

fn write_number(worksheet: &mut Worksheet, row: RowNum, col: ColNum, number: f64) -> Result<()> {
    if number.is_nan() {
        return Ok(());
    }
    if number.is_infinite() {
        let text = if number > 0.0 { "inf" } else { "-inf" };
        return write_text(worksheet, row, col, text);
    }
    worksheet
        .write_number(row, col, number)
        .map(drop)
        .map_err(xlsx_error)
}

fn write_text(worksheet: &mut Worksheet, row: RowNum, col: ColNum, text: &str) -> Result<()> {
    worksheet
        .write_string(row, col, text)
        .map(drop)
        .map_err(xlsx_error)
}

fn xlsx_error(e: XlsxError) -> PipelineError {
    PipelineError::Encode(e.to_string())
}
