//! Impute stage: down-shifted normal draws for missing values.

use crate::data::ImputationMethod;
use crate::error::{ProteolysisError, Result};
use crate::prep::IntensityMatrix;
use crate::test::descriptive::{mean, std_dev};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use tracing::debug;

/// Replace NaN cells.
///
/// For `NormalDistribution { shift, width }` every column gets its own
/// `N(mean - shift * sd, width * sd)`, with mean and sd taken from the
/// column's observed values. Columns are visited left to right and rows top
/// to bottom, so a seeded `rng` gives reproducible output.
///
/// # Arguments
/// * `matrix` - Normalized intensities
/// * `method` - Imputation method
/// * `rng` - Source of randomness for the draws
pub fn impute<R: Rng + ?Sized>(
    matrix: &IntensityMatrix,
    method: ImputationMethod,
    rng: &mut R,
) -> Result<IntensityMatrix> {
    let (shift, width) = match method {
        ImputationMethod::None => return Ok(matrix.with_stage(matrix.data.clone(), "impute")),
        ImputationMethod::NormalDistribution { shift, width } => (shift, width),
    };

    let mut data = matrix.data.clone();
    for j in 0..matrix.n_columns() {
        let column = matrix.column(j);
        let n_missing = column.iter().filter(|v| v.is_nan()).count();
        if n_missing == 0 {
            continue;
        }

        let mu = mean(&column);
        let sd = std_dev(&column);
        if mu.is_nan() || sd.is_nan() {
            return Err(ProteolysisError::EmptyData(format!(
                "column '{}' needs at least two observed values for imputation",
                matrix.column_names[j]
            )));
        }

        let normal = Normal::new(mu - shift * sd, width * sd)
            .map_err(|e| ProteolysisError::Numerical(format!("imputation distribution: {}", e)))?;
        for i in 0..matrix.n_rows() {
            if data[(i, j)].is_nan() {
                data[(i, j)] = normal.sample(rng);
            }
        }
        debug!(column = %matrix.column_names[j], n_missing, "imputed column");
    }

    Ok(matrix.with_stage(data, "impute"))
}
