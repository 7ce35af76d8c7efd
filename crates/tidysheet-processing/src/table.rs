//! The in-memory table the pipeline works on.
//!
//! A [`Table`] wraps a polars `DataFrame` (ordered, uniquely named,
//! equal-length columns) together with an explicit [`ColumnKind`] per column.
//! Kinds are computed when the table is built and recomputed whenever a
//! transform swaps the underlying frame, so callers never see stale kinds.

use polars::prelude::*;
use std::collections::HashSet;
use tracing::debug;

use crate::error::{PipelineError, Result, ResultExt};
use crate::types::ColumnKind;
use crate::utils::{column_kind, count_missing};

#[derive(Debug, Clone)]
pub struct Table {
    df: DataFrame,
    kinds: Vec<ColumnKind>,
}

impl Table {
    pub fn new(df: DataFrame) -> Self {
        let kinds = infer_kinds(&df);
        Self { df, kinds }
    }

    pub fn data_frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn into_data_frame(self) -> DataFrame {
        self.df
    }

    pub fn row_count(&self) -> usize {
        self.df.height()
    }

    pub fn column_count(&self) -> usize {
        self.df.width()
    }

    /// Column names in table order.
    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    /// Per-column kinds, aligned with [`Table::column_names`].
    pub fn kinds(&self) -> &[ColumnKind] {
        &self.kinds
    }

    /// Kind of a single column.
    pub fn column_kind(&self, name: &str) -> Result<ColumnKind> {
        self.df
            .get_column_index(name)
            .and_then(|idx| self.kinds.get(idx).copied())
            .ok_or_else(|| PipelineError::ColumnNotFound(name.to_string()))
    }

    /// Names of numeric columns, in table order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .into_iter()
            .zip(&self.kinds)
            .filter(|(_, kind)| kind.is_numeric())
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// Total number of missing cells across all columns. Float NaN counts
    /// as missing.
    pub fn missing_count(&self) -> usize {
        self.df.get_columns().iter().map(count_missing).sum()
    }

    pub fn has_missing(&self) -> bool {
        self.df.get_columns().iter().any(|col| count_missing(col) > 0)
    }

    /// Borrow a column, or fail with [`PipelineError::ColumnNotFound`].
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.df
            .column(name)
            .map_err(|_| PipelineError::ColumnNotFound(name.to_string()))
    }

    /// The first `n` rows as a new frame.
    pub fn head(&self, n: usize) -> DataFrame {
        self.df.head(Some(n))
    }

    /// Swap in a transformed frame and recompute column kinds.
    pub(crate) fn replace_frame(&mut self, df: DataFrame) {
        self.df = df;
        self.refresh_kinds();
    }

    pub(crate) fn refresh_kinds(&mut self) {
        self.kinds = infer_kinds(&self.df);
    }

    /// Keep only the named columns, in the given order.
    ///
    /// An empty selection returns the table unchanged rather than a table
    /// with no columns. A name repeated in the selection keeps its first
    /// position. Every name must exist, otherwise
    /// [`PipelineError::ColumnNotFound`] is returned and nothing changes.
    pub fn select_columns<S: AsRef<str>>(&self, names: &[S]) -> Result<Table> {
        if names.is_empty() {
            debug!("Empty column selection, keeping all {} columns", self.column_count());
            return Ok(self.clone());
        }

        let mut seen = HashSet::with_capacity(names.len());
        let mut selection = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            if self.df.get_column_index(name).is_none() {
                return Err(PipelineError::ColumnNotFound(name.to_string()));
            }
            if seen.insert(name) {
                selection.push(name);
            }
        }

        let df = self.df.select(selection).context("Column projection")?;
        debug!("Projected {} of {} columns", df.width(), self.column_count());
        Ok(Table::new(df))
    }
}

/// Tables are equal when they have the same columns, in the same order,
/// with equal values (missing equals missing).
impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.df.equals_missing(&other.df)
    }
}

impl From<DataFrame> for Table {
    fn from(df: DataFrame) -> Self {
        Table::new(df)
    }
}

fn infer_kinds(df: &DataFrame) -> Vec<ColumnKind> {
    df.get_columns()
        .iter()
        .map(|col| column_kind(col.dtype()))
        .collect()
}
