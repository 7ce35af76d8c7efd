use polars::prelude::*;
use serde::Serialize;

use crate::error::{PipelineError, Result, ResultExt};
use crate::table::Table;

/// Values of one numeric column in row order, ready for a bar chart.
///
/// `labels[i]` is the row position of `values[i]`. Missing cells (NaN
/// included) stay `None` so the chart can leave a gap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub column: String,
    pub labels: Vec<usize>,
    pub values: Vec<Option<f64>>,
}

impl ChartSeries {
    /// Extract `column` from `table`.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::ColumnNotFound`] if the column is absent
    /// - [`PipelineError::NotNumeric`] if its kind is not numeric
    pub fn from_table(table: &Table, column: &str) -> Result<Self> {
        let kind = table.column_kind(column)?;
        if !kind.is_numeric() {
            return Err(PipelineError::NotNumeric {
                column: column.to_string(),
                kind,
            });
        }

        let values: Vec<Option<f64>> = table
            .column(column)?
            .as_materialized_series()
            .cast(&DataType::Float64)
            .context(format!("Reading chart values from '{column}'"))?
            .f64()
            .context(format!("Reading chart values from '{column}'"))?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();

        Ok(Self {
            column: column.to_string(),
            labels: (0..values.len()).collect(),
            values,
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
