//! Normalize stage: median centering.

use crate::data::NormalizationMethod;
use crate::error::{ProteolysisError, Result};
use crate::prep::IntensityMatrix;
use crate::test::descriptive::median;
use rayon::prelude::*;

/// Normalize each column.
///
/// `Median` subtracts the NaN-ignoring median of every column, so each
/// column's finite values end up centred on zero. A column without any
/// finite value cannot be centred and is reported as an error.
pub fn normalize(matrix: &IntensityMatrix, method: NormalizationMethod) -> Result<IntensityMatrix> {
    match method {
        NormalizationMethod::None => Ok(matrix.with_stage(matrix.data.clone(), "normalize")),
        NormalizationMethod::Median => {
            let medians: Vec<f64> = (0..matrix.n_columns())
                .into_par_iter()
                .map(|j| median(&matrix.column(j)))
                .collect();

            if let Some(j) = medians.iter().position(|m| m.is_nan()) {
                return Err(ProteolysisError::EmptyData(format!(
                    "column '{}' has no finite values to normalize",
                    matrix.column_names[j]
                )));
            }

            let mut data = matrix.data.clone();
            for (j, m) in medians.iter().enumerate() {
                data.column_mut(j).add_scalar_mut(-m);
            }
            Ok(matrix.with_stage(data, "normalize"))
        }
    }
}
