//! Row-level cleaning operations.
//!
//! This module provides duplicate row removal. Missing value handling lives
//! in [`crate::imputers`].

use polars::prelude::*;
use tracing::{debug, info};

use crate::error::{Result, ResultExt};
use crate::table::Table;
use crate::types::{CleaningAction, CleaningReport};

/// Data cleaner for manual, user-triggered cleaning operations.
pub struct DataCleaner;

impl DataCleaner {
    /// Remove rows that exactly duplicate an earlier row across all columns.
    ///
    /// The first occurrence is kept and the relative order of kept rows is
    /// preserved. Missing values compare equal to each other. Applying this
    /// twice gives the same table as applying it once.
    pub fn remove_duplicates(table: &mut Table) -> Result<CleaningReport> {
        let before = table.row_count();

        if table.column_count() > 0 {
            let deduped = table
                .data_frame()
                .unique_stable(None, UniqueKeepStrategy::First, None)
                .context("Removing duplicate rows")?;
            table.replace_frame(deduped);
        }

        let after = table.row_count();
        let removed = before - after;
        if removed > 0 {
            let pct = (removed as f64 / before as f64) * 100.0;
            info!("Removed {} duplicate rows ({:.1}%)", removed, pct);
        } else {
            debug!("No duplicate rows found");
        }

        Ok(CleaningReport {
            action: CleaningAction::RemoveDuplicates,
            rows_before: before,
            rows_after: after,
            cells_filled: 0,
            columns_filled: Vec::new(),
            columns_skipped: Vec::new(),
        })
    }
}
