//! Statistical tests.
//!
//! Every test is a pure function over replicate values. Numerical
//! degeneracies of a single comparison (too few values, zero variance,
//! singular design) yield NaN statistics instead of errors; errors are
//! reserved for invalid parameters and mismatched inputs.

pub mod chi;
pub(crate) mod dist;
pub mod tost;

pub use chi::{test_chi, ChiSquareResult, Representation};
pub use ci::{ci_mean, ci_mean_difference, ConfidenceInterval};
pub use ftest::{test_f, FTestResult};
pub use slope::{test_slope, SlopeResult};
pub use tost::{auto_theta, test_tost, Theta, TostParams, TostResult};
pub use ttest::{test_t_independent, test_t_paired, TTestResult};

use crate::error::{ProteolysisError, Result};

/// Significance levels must lie strictly between 0 and 1.
pub(crate) fn check_alpha(alpha: f64) -> Result<()> {
    if alpha > 0.0 && alpha < 1.0 {
        Ok(())
    } else {
        Err(ProteolysisError::InvalidParameter(format!(
            "alpha must be in (0, 1), got {}",
            alpha
        )))
    }
}
