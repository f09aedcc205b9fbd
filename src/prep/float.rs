//! Float stage: cast intensity columns to a numeric matrix.

use crate::data::table::parse_cell;
use crate::data::{MissingPolicy, RawTable};
use crate::error::Result;
use crate::prep::IntensityMatrix;
use nalgebra::DMatrix;

/// Cast the given columns of `table` to f64.
///
/// Empty cells and missing markers become NaN. Under
/// [`MissingPolicy::ZeroIsMissing`] literal zeros become NaN as well, so no
/// later stage ever sees them.
///
/// # Arguments
/// * `table` - Filtered input table
/// * `columns` - Column indices, in the order they should appear in the matrix
/// * `missing` - Whether zero means "not detected"
pub fn to_float(table: &RawTable, columns: &[usize], missing: MissingPolicy) -> Result<IntensityMatrix> {
    let mut column_names = Vec::with_capacity(columns.len());
    for &c in columns {
        column_names.push(table.header(c)?.to_string());
    }

    let n_rows = table.n_rows();
    let mut data = DMatrix::from_element(n_rows, columns.len(), f64::NAN);
    for (j, &c) in columns.iter().enumerate() {
        for (i, cell) in table.column(c)?.into_iter().enumerate() {
            let value = parse_cell(cell, i, &column_names[j])?;
            data[(i, j)] = match missing {
                MissingPolicy::ZeroIsMissing if value == 0.0 => f64::NAN,
                _ => value,
            };
        }
    }

    Ok(IntensityMatrix {
        data,
        column_names,
        stage: "float".to_string(),
    })
}
