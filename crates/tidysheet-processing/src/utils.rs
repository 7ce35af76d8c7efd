//! Shared utilities for the tabular pipeline.
//!
//! This module contains helpers used across the decoder, cleaners, encoders
//! and reporting so they agree on what counts as numeric, how cells look as
//! JSON, and how output files are named.

use polars::prelude::*;
use serde_json::{Number, Value};

use crate::types::{ColumnKind, FileFormat};

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a date/time type.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time | DataType::Duration(_)
    )
}

/// Map a polars DataType to the pipeline's column kind.
pub fn column_kind(dtype: &DataType) -> ColumnKind {
    if is_numeric_dtype(dtype) {
        ColumnKind::Numeric
    } else if is_datetime_dtype(dtype) {
        ColumnKind::Datetime
    } else if matches!(dtype, DataType::Boolean) {
        ColumnKind::Boolean
    } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
        ColumnKind::Text
    } else {
        ColumnKind::Other
    }
}

// =============================================================================
// Numeric Utilities
// =============================================================================

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Fill null values in a numeric Series with a specific value.
///
/// The result is always Float64, whatever the input numeric type.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let mask = series.is_null();
    let len = series.len();
    let mut result_vec = Vec::with_capacity(len);

    for i in 0..len {
        if mask.get(i).unwrap_or(false) {
            result_vec.push(Some(fill_value));
        } else {
            let val = series.get(i)?;
            result_vec.push(Some(val.try_extract::<f64>()?));
        }
    }

    Ok(Series::new(series.name().clone(), result_vec))
}

/// Replace NaN with null in a float Series. Other dtypes are returned as-is.
pub fn nan_to_null(series: &Series) -> PolarsResult<Series> {
    let name = series.name().clone();
    let out = match series.dtype() {
        DataType::Float64 => series
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect::<Float64Chunked>()
            .with_name(name)
            .into_series(),
        DataType::Float32 => series
            .f32()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect::<Float32Chunked>()
            .with_name(name)
            .into_series(),
        _ => series.clone(),
    };
    Ok(out)
}

/// Number of missing cells in a column: nulls, plus NaN in float columns.
pub fn count_missing(column: &Column) -> usize {
    let series = column.as_materialized_series();
    let nan = match series.dtype() {
        DataType::Float64 => series
            .f64()
            .map(|ca| ca.into_iter().flatten().filter(|x| x.is_nan()).count())
            .unwrap_or(0),
        DataType::Float32 => series
            .f32()
            .map(|ca| ca.into_iter().flatten().filter(|x| x.is_nan()).count())
            .unwrap_or(0),
        _ => 0,
    };
    series.null_count() + nan
}

// =============================================================================
// Cell Conversion
// =============================================================================

/// Converts a Polars `AnyValue` to a JSON `Value` for the display boundary.
///
/// NaN and infinite floats become `null`; temporal and other complex values
/// are stringified with their `Display` form.
pub fn any_value_to_json(value: AnyValue<'_>) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Bool(b),

        AnyValue::Int8(i) => Value::Number(i.into()),
        AnyValue::Int16(i) => Value::Number(i.into()),
        AnyValue::Int32(i) => Value::Number(i.into()),
        AnyValue::Int64(i) => Value::Number(i.into()),

        AnyValue::UInt8(u) => Value::Number(u.into()),
        AnyValue::UInt16(u) => Value::Number(u.into()),
        AnyValue::UInt32(u) => Value::Number(u.into()),
        AnyValue::UInt64(u) => Value::Number(u.into()),

        AnyValue::Float32(f) => Number::from_f64(f64::from(f))
            .map(Value::Number)
            .unwrap_or(Value::Null),
        AnyValue::Float64(f) => Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),

        AnyValue::String(s) => Value::String(s.to_string()),
        AnyValue::StringOwned(s) => Value::String(s.to_string()),

        other => Value::String(format!("{other}")),
    }
}

// =============================================================================
// File Names
// =============================================================================

/// Derive the download name: the source name with its extension swapped for
/// the target format's canonical one.
///
/// Only the last extension is replaced (`my.data.csv` → `my.data.xlsx`); a
/// name without an extension gets one appended.
pub fn output_file_name(source_name: &str, format: FileFormat) -> String {
    let stem = match source_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => source_name,
    };
    format!("{stem}.{}", format.extension())
}

// =============================================================================
// Tests
// =============================================================================
