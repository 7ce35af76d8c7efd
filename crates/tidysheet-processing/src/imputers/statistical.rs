//! Statistical imputation methods.
//!
//! Provides mean imputation for numeric columns.

use tracing::{debug, info, warn};

use crate::error::{Result, ResultExt};
use crate::table::Table;
use crate::types::{CleaningAction, CleaningReport};
use crate::utils::{fill_numeric_nulls, nan_to_null};

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Replace missing cells of every numeric column with that column's mean.
    ///
    /// Float NaN counts as missing. The mean is taken over the present values
    /// at the time of the call, so the column mean is unchanged by the fill. Filled columns become
    /// Float64. Non-numeric columns are never touched. A numeric column with
    /// no present values is left as-is and listed in
    /// [`CleaningReport::columns_skipped`].
    pub fn fill_numeric_means(table: &mut Table) -> Result<CleaningReport> {
        let rows = table.row_count();
        let mut df = table.data_frame().clone();
        let mut cells_filled = 0;
        let mut columns_filled = Vec::new();
        let mut columns_skipped = Vec::new();

        for col_name in table.numeric_columns() {
            let series = nan_to_null(table.column(&col_name)?.as_materialized_series())
                .context(format!("Reading '{col_name}'"))?;
            let missing = series.null_count();
            if missing == 0 {
                continue;
            }

            let Some(mean) = series.mean() else {
                warn!(
                    "Column '{}' has no values to average, leaving {} missing cells",
                    col_name, missing
                );
                columns_skipped.push(col_name);
                continue;
            };

            let filled = fill_numeric_nulls(&series, mean)
                .context(format!("Filling missing values in '{col_name}'"))?;
            df.replace(&col_name, filled)
                .context(format!("Replacing column '{col_name}'"))?;

            debug!("Mean imputed '{}': {} values with {}", col_name, missing, mean);
            cells_filled += missing;
            columns_filled.push(col_name);
        }

        if cells_filled > 0 {
            table.replace_frame(df);
            info!(
                "Filled {} missing values across {} numeric columns",
                cells_filled,
                columns_filled.len()
            );
        } else {
            debug!("No missing numeric values to fill");
        }

        Ok(CleaningReport {
            action: CleaningAction::FillMissing,
            rows_before: rows,
            rows_after: rows,
            cells_filled,
            columns_filled,
            columns_skipped,
        })
    }
}
