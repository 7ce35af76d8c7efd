//! XLSX decoding via calamine.
//!
//! Only the first worksheet is read. Its first row is the header; every
//! column's type is inferred from the non-empty cells below it:
//!
//! | Cells                         | Column type |
//! |-------------------------------|-------------|
//! | integers (incl. `30.0`)       | Int64       |
//! | any mix of numbers            | Float64     |
//! | booleans                      | Boolean     |
//! | anything else                 | String      |
//!
//! Empty cells and text cells matching one of the configured NA tokens
//! become missing values.

use calamine::{Data, DataType as _, Reader, Xlsx, open_workbook_from_rs};
use chrono::{NaiveDateTime, NaiveTime};
use polars::prelude::*;
use std::collections::HashSet;
use std::io::Cursor;

use crate::error::{PipelineError, Result};

/// Largest magnitude at which every integer is exactly representable in f64.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

static EMPTY: Data = Data::Empty;

/// Reads the first sheet of an XLSX workbook into a DataFrame.
pub(crate) fn read_xlsx(name: &str, bytes: &[u8], na_values: &[String]) -> Result<DataFrame> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))
        .map_err(|e| PipelineError::decode(name, format!("not a readable workbook: {e}")))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| PipelineError::decode(name, "workbook has no sheets"))?
        .map_err(|e| PipelineError::decode(name, format!("failed to read first sheet: {e}")))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| PipelineError::decode(name, "first sheet is empty"))?;
    let names = header_names(header);

    let mut cells: Vec<Vec<&Data>> = vec![Vec::with_capacity(range.height()); names.len()];
    for row in rows {
        for (column, cell) in cells.iter_mut().zip(row) {
            if is_na(cell, na_values) {
                column.push(&EMPTY);
            } else {
                column.push(cell);
            }
        }
    }

    let columns = names
        .into_iter()
        .zip(&cells)
        .map(|(col_name, col_cells)| build_column(&col_name, col_cells))
        .collect();

    DataFrame::new(columns).map_err(|e| PipelineError::decode(name, e))
}

fn is_na(cell: &Data, na_values: &[String]) -> bool {
    matches!(cell, Data::String(s) if na_values.iter().any(|na| na == s))
}

/// Turn the header row into unique column names.
///
/// Blank headers become `Unnamed: <index>`; repeats get `.1`, `.2`, ...
fn header_names(header: &[Data]) -> Vec<String> {
    let raw = header.iter().enumerate().map(|(idx, cell)| match cell {
        Data::Empty => format!("Unnamed: {idx}"),
        Data::String(s) if s.trim().is_empty() => format!("Unnamed: {idx}"),
        other => cell_text(other).unwrap_or_default(),
    });

    let mut seen = HashSet::new();
    let mut names = Vec::with_capacity(header.len());
    for name in raw {
        if seen.insert(name.clone()) {
            names.push(name);
            continue;
        }
        let mut suffix = 1;
        loop {
            let candidate = format!("{name}.{suffix}");
            if seen.insert(candidate.clone()) {
                names.push(candidate);
                break;
            }
            suffix += 1;
        }
    }
    names
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellType {
    Empty,
    Int,
    Float,
    Bool,
    Text,
}

impl CellType {
    fn of(cell: &Data) -> Self {
        match cell {
            Data::Empty => CellType::Empty,
            Data::Int(_) => CellType::Int,
            Data::Float(f) if is_integral(*f) => CellType::Int,
            Data::Float(_) => CellType::Float,
            Data::Bool(_) => CellType::Bool,
            _ => CellType::Text,
        }
    }

    fn merge(self, other: CellType) -> CellType {
        match (self, other) {
            (CellType::Empty, t) | (t, CellType::Empty) => t,
            (a, b) if a == b => a,
            (CellType::Int | CellType::Float, CellType::Int | CellType::Float) => CellType::Float,
            _ => CellType::Text,
        }
    }
}

fn is_integral(f: f64) -> bool {
    f.is_finite() && f.fract() == 0.0 && f.abs() <= MAX_EXACT_INT
}

fn build_column(name: &str, cells: &[&Data]) -> Column {
    let column_type = cells
        .iter()
        .fold(CellType::Empty, |acc, cell| acc.merge(CellType::of(cell)));

    let series = match column_type {
        CellType::Int => {
            let values: Vec<Option<i64>> = cells
                .iter()
                .map(|cell| match cell {
                    Data::Int(i) => Some(*i),
                    Data::Float(f) => Some(*f as i64),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), values)
        }
        CellType::Float => {
            let values: Vec<Option<f64>> = cells
                .iter()
                .map(|cell| match cell {
                    Data::Int(i) => Some(*i as f64),
                    Data::Float(f) => Some(*f),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), values)
        }
        CellType::Bool => {
            let values: Vec<Option<bool>> = cells
                .iter()
                .map(|cell| match cell {
                    Data::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), values)
        }
        CellType::Empty | CellType::Text => {
            let values: Vec<Option<String>> = cells.iter().map(|cell| cell_text(cell)).collect();
            Series::new(name.into(), values)
        }
    };

    Column::from(series)
}

/// Text form of a cell for string columns. `None` for empty cells.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        Data::DateTime(_) | Data::DateTimeIso(_) => Some(
            cell.as_datetime()
                .map(format_datetime)
                .unwrap_or_else(|| cell.to_string()),
        ),
        other => Some(other.to_string()),
    }
}

fn format_datetime(dt: NaiveDateTime) -> String {
    if dt.time() == NaiveTime::MIN {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
