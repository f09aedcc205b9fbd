//! Multiple testing correction.

pub mod bh;
pub mod fwer;

pub use bh::correct_bh;
pub use fwer::{correct_bonferroni, correct_holm};

use serde::{Deserialize, Serialize};

/// Correction applied to the p-values of one experimental label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CorrectionMethod {
    #[default]
    None,
    BenjaminiHochberg,
    Bonferroni,
    Holm,
}

impl CorrectionMethod {
    /// Adjusted p-values in input order. NaN stays NaN.
    pub fn adjust(self, p_values: &[f64]) -> Vec<f64> {
        match self {
            Self::None => p_values.to_vec(),
            Self::BenjaminiHochberg => correct_bh(p_values),
            Self::Bonferroni => correct_bonferroni(p_values),
            Self::Holm => correct_holm(p_values),
        }
    }

    pub fn is_none(self) -> bool {
        self == Self::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_identity() {
        let p = vec![0.2, 0.01];
        assert_eq!(CorrectionMethod::None.adjust(&p), p);
    }

    #[test]
    fn test_adjusted_never_smaller() {
        let p = [0.001, 0.02, 0.03, 0.5];
        for method in [
            CorrectionMethod::BenjaminiHochberg,
            CorrectionMethod::Bonferroni,
            CorrectionMethod::Holm,
        ] {
            for (a, raw) in method.adjust(&p).iter().zip(&p) {
                assert!(a >= raw);
            }
        }
    }
}
