//! Chi-square test of independence on a contingency table.

use crate::error::{ProteolysisError, Result};
use crate::test::{check_alpha, dist};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Over- or under-representation of one cell relative to its expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Representation {
    Under,
    NotSignificant,
    Over,
}

impl Representation {
    /// -1, 0 or 1.
    pub fn as_i8(self) -> i8 {
        match self {
            Self::Under => -1,
            Self::NotSignificant => 0,
            Self::Over => 1,
        }
    }
}

/// Result of a chi-square test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChiSquareResult {
    pub statistic: f64,
    pub df: f64,
    pub p_value: f64,
    /// Direction of each column of the first row, relative to expectation.
    /// All `NotSignificant` unless `p_value < alpha`.
    pub directions: Vec<Representation>,
}

impl ChiSquareResult {
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }

    /// `(direction, p_value)` for one column of the first row.
    pub fn direction(&self, col: usize) -> (i8, f64) {
        let d = self
            .directions
            .get(col)
            .copied()
            .unwrap_or(Representation::NotSignificant);
        (d.as_i8(), self.p_value)
    }
}

/// Chi-square test of independence.
///
/// Rows and columns whose totals are zero are dropped before testing. The
/// first row is the observed group of interest (e.g. one experiment) and the
/// remaining rows the reference; `directions` reports, for each original
/// column, whether the first row is over- or under-represented. Exact ties
/// with the expectation report `NotSignificant`. Fewer than two usable rows
/// or columns give a NaN p-value.
pub fn test_chi(observed: &DMatrix<f64>, alpha: f64) -> Result<ChiSquareResult> {
    check_alpha(alpha)?;
    if observed.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(ProteolysisError::InvalidParameter(
            "contingency table must contain non-negative finite counts".to_string(),
        ));
    }

    let (nrows, ncols) = observed.shape();
    let rows: Vec<usize> = (0..nrows).filter(|&i| observed.row(i).sum() > 0.0).collect();
    let cols: Vec<usize> = (0..ncols).filter(|&j| observed.column(j).sum() > 0.0).collect();

    let mut directions = vec![Representation::NotSignificant; ncols];
    if rows.len() < 2 || cols.len() < 2 || rows[0] != 0 {
        return Ok(ChiSquareResult {
            statistic: f64::NAN,
            df: f64::NAN,
            p_value: f64::NAN,
            directions,
        });
    }

    let row_totals: Vec<f64> = rows.iter().map(|&i| observed.row(i).sum()).collect();
    let col_totals: Vec<f64> = cols.iter().map(|&j| observed.column(j).sum()).collect();
    let total: f64 = row_totals.iter().sum();

    let mut statistic = 0.0;
    for (ri, &i) in rows.iter().enumerate() {
        for (ci, &j) in cols.iter().enumerate() {
            let expected = row_totals[ri] * col_totals[ci] / total;
            statistic += (observed[(i, j)] - expected).powi(2) / expected;
        }
    }
    let df = ((rows.len() - 1) * (cols.len() - 1)) as f64;
    let p_value = dist::chi2_sf(statistic, df);

    if p_value < alpha {
        for (ci, &j) in cols.iter().enumerate() {
            let expected = row_totals[0] * col_totals[ci] / total;
            let obs = observed[(0, j)];
            directions[j] = if obs > expected {
                Representation::Over
            } else if obs < expected {
                Representation::Under
            } else {
                Representation::NotSignificant
            };
        }
    }

    Ok(ChiSquareResult {
        statistic,
        df,
        p_value,
        directions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_chi_independent_table() {
        let observed = DMatrix::from_row_slice(2, 3, &[10.0, 20.0, 30.0, 20.0, 40.0, 60.0]);
        let result = test_chi(&observed, 0.05).unwrap();
        assert_relative_eq!(result.statistic, 0.0, epsilon = 1e-12);
        assert_relative_eq!(result.p_value, 1.0, epsilon = 1e-9);
        assert!(result
            .directions
            .iter()
            .all(|d| *d == Representation::NotSignificant));
    }

    #[test]
    fn test_chi_2x3_df2_closed_form() {
        // Row totals 30/30, column totals 20/20/20, expected 10 everywhere.
        let observed = DMatrix::from_row_slice(2, 3, &[20.0, 5.0, 5.0, 0.0, 15.0, 15.0]);
        let result = test_chi(&observed, 0.05).unwrap();
        // (100 + 25 + 25) / 10 * 2 = 30
        assert_relative_eq!(result.statistic, 30.0, epsilon = 1e-12);
        assert_relative_eq!(result.df, 2.0);
        assert_relative_eq!(result.p_value, (-15.0f64).exp(), max_relative = 1e-6);
        assert_eq!(result.direction(0), (1, result.p_value));
        assert_eq!(result.direction(1).0, -1);
        assert_eq!(result.direction(2).0, -1);
    }

    #[test]
    fn test_chi_drops_empty_columns() {
        let observed = DMatrix::from_row_slice(2, 4, &[20.0, 0.0, 5.0, 5.0, 0.0, 0.0, 15.0, 15.0]);
        let result = test_chi(&observed, 0.05).unwrap();
        assert_relative_eq!(result.df, 2.0);
        assert_eq!(result.directions[1], Representation::NotSignificant);
    }

    #[test]
    fn test_chi_empty_first_row() {
        let observed = DMatrix::from_row_slice(2, 2, &[0.0, 0.0, 5.0, 5.0]);
        let result = test_chi(&observed, 0.05).unwrap();
        assert!(result.p_value.is_nan());
    }

    #[test]
    fn test_chi_rejects_negative_counts() {
        let observed = DMatrix::from_row_slice(2, 2, &[1.0, -1.0, 5.0, 5.0]);
        assert!(test_chi(&observed, 0.05).is_err());
    }
}
