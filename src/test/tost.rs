//! Two One-Sided Tests (TOST) for equivalence.
//!
//! The null hypothesis is that the experimental mean differs from the
//! control mean by at least `theta`; rejecting both one-sided nulls
//! (difference <= -theta and difference >= theta) concludes equivalence.

use crate::error::{ProteolysisError, Result};
use crate::test::ttest::paired_differences;
use crate::test::{check_alpha, descriptive, dist};
use serde::{Deserialize, Serialize};

/// Equivalence margin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Theta {
    /// User supplied margin (>= 0).
    Fixed(f64),
    /// Margin derived from the data, never larger than `max`.
    Auto { max: f64 },
}

/// Parameters of the equivalence test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TostParams {
    /// Significance level of each one-sided test.
    pub alpha: f64,
    /// Type II error rate used for the automatic margin.
    pub beta: f64,
    /// Confidence of the upper bound on the standard deviation.
    pub gamma: f64,
    pub theta: Theta,
    /// Replicates are paired by position.
    pub paired: bool,
}

impl TostParams {
    pub fn validate(&self) -> Result<()> {
        check_alpha(self.alpha)?;
        for (name, value) in [("beta", self.beta), ("gamma", self.gamma)] {
            if !(value > 0.0 && value < 1.0) {
                return Err(ProteolysisError::InvalidParameter(format!(
                    "{} must be in (0, 1), got {}",
                    name, value
                )));
            }
        }
        let margin = match self.theta {
            Theta::Fixed(t) => t,
            Theta::Auto { max } => max,
        };
        if !(margin >= 0.0) || !margin.is_finite() {
            return Err(ProteolysisError::InvalidParameter(format!(
                "theta must be finite and non-negative, got {}",
                margin
            )));
        }
        Ok(())
    }
}

/// Result of the equivalence test for one control/experiment comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TostResult {
    /// Margin actually used.
    pub theta: f64,
    /// mean(experiment) - mean(control), or the mean paired difference.
    pub difference: f64,
    pub std_error: f64,
    pub df: f64,
    /// Ordinary two-sided t statistic and p-value.
    pub t_two: f64,
    pub p_two: f64,
    /// H0: difference <= -theta.
    pub t_lower: f64,
    pub p_lower: f64,
    /// H0: difference >= theta.
    pub t_upper: f64,
    pub p_upper: f64,
    /// max(p_lower, p_upper).
    pub p_tost: f64,
    pub equivalent: bool,
}

/// Smallest margin that the design can declare equivalent with power `1 - beta`.
///
/// `theta = (t(1 - alpha, df) + t(1 - beta/2, df)) * s_up * scale`, where
/// `s_up = s * sqrt(df / chi2(1 - gamma, df))` is the upper `gamma`
/// confidence bound of the standard deviation `s` and `scale` converts a
/// standard deviation into the standard error of the difference. The margin
/// is clipped to `theta_max`.
pub fn auto_theta(
    std_dev: f64,
    df: f64,
    scale: f64,
    alpha: f64,
    beta: f64,
    gamma: f64,
    theta_max: f64,
) -> f64 {
    let chi = dist::chi2_quantile(1.0 - gamma, df);
    let s_up = std_dev * (df / chi).sqrt();
    let t_sum = dist::t_quantile(1.0 - alpha, df) + dist::t_quantile(1.0 - beta / 2.0, df);
    let theta = t_sum * s_up * scale;
    if theta.is_nan() {
        theta
    } else {
        theta.min(theta_max)
    }
}

/// True when both slices hold the same finite values, in any order.
fn same_values(a: &[f64], b: &[f64]) -> bool {
    let mut a = descriptive::finite(a);
    let mut b = descriptive::finite(b);
    if a.is_empty() || a.len() != b.len() {
        return false;
    }
    a.sort_by(f64::total_cmp);
    b.sort_by(f64::total_cmp);
    a == b
}

/// Equivalence test of `experiment` against `control`.
///
/// Paired data requires slices of equal length and uses only complete
/// pairs. When the standard error is zero, or both samples hold the same
/// values, the decision is exact: equivalent if and only if
/// `|difference| <= theta`.
pub fn test_tost(control: &[f64], experiment: &[f64], params: &TostParams) -> Result<TostResult> {
    params.validate()?;

    let (difference, std_dev, std_error, df, scale) = if params.paired {
        let d = paired_differences(experiment, control)?;
        let n = d.len() as f64;
        let s = descriptive::std_dev(&d);
        let scale = (1.0 / n).sqrt();
        (descriptive::mean(&d), s, s * scale, n - 1.0, scale)
    } else {
        let n1 = descriptive::finite(control).len() as f64;
        let n2 = descriptive::finite(experiment).len() as f64;
        let df = n1 + n2 - 2.0;
        let sp = (((n1 - 1.0) * descriptive::variance(control)
            + (n2 - 1.0) * descriptive::variance(experiment))
            / df)
            .sqrt();
        let scale = (1.0 / n1 + 1.0 / n2).sqrt();
        (
            descriptive::mean(experiment) - descriptive::mean(control),
            sp,
            sp * scale,
            df,
            scale,
        )
    };

    let theta = match params.theta {
        Theta::Fixed(t) => t,
        Theta::Auto { max } => auto_theta(
            std_dev,
            df,
            scale,
            params.alpha,
            params.beta,
            params.gamma,
            max,
        ),
    };

    // Summation order can leave a rounding residue between equal samples.
    let identical = !params.paired && same_values(control, experiment);
    let difference = if identical { 0.0 } else { difference };

    let t_two = difference / std_error;
    let t_lower = (difference + theta) / std_error;
    let t_upper = (difference - theta) / std_error;

    let exact = (std_error == 0.0 || identical) && difference.is_finite();
    let (p_two, p_lower, p_upper) = if exact {
        (
            if difference == 0.0 { 1.0 } else { 0.0 },
            if difference + theta >= 0.0 { 0.0 } else { 1.0 },
            if difference - theta <= 0.0 { 0.0 } else { 1.0 },
        )
    } else {
        (
            dist::t_two_sided(t_two, df),
            dist::t_sf(t_lower, df),
            dist::t_cdf(t_upper, df),
        )
    };

    let p_tost = p_lower.max(p_upper);
    let equivalent = if exact && !theta.is_nan() {
        difference.abs() <= theta
    } else {
        p_tost < params.alpha
    };

    Ok(TostResult {
        theta,
        difference,
        std_error,
        df,
        t_two,
        p_two,
        t_lower,
        p_lower,
        t_upper,
        p_upper,
        p_tost,
        equivalent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params(theta: Theta, paired: bool) -> TostParams {
        TostParams {
            alpha: 0.05,
            beta: 0.05,
            gamma: 0.8,
            theta,
            paired,
        }
    }

    #[test]
    fn test_tost_paired_fixed_theta() {
        // Differences [1, 2, 3]: mean 2, se 1/sqrt(3), df 2
        let control = [1.0, 2.0, 3.0];
        let experiment = [2.0, 4.0, 6.0];
        let result = test_tost(&control, &experiment, &params(Theta::Fixed(5.0), true)).unwrap();

        assert_relative_eq!(result.difference, 2.0);
        assert_relative_eq!(result.t_lower, 12.124355652982139, epsilon = 1e-9);
        assert_relative_eq!(result.p_lower, 0.0033670416675777304, epsilon = 1e-4);
        assert_relative_eq!(result.t_upper, -5.196152422706631, epsilon = 1e-9);
        assert_relative_eq!(result.p_upper, 0.01754935932299234, epsilon = 1e-4);
        assert_relative_eq!(result.p_tost, result.p_upper);
        assert!(result.equivalent);
    }

    #[test]
    fn test_tost_not_equivalent_with_small_margin() {
        let control = [1.0, 2.0, 3.0];
        let experiment = [2.0, 4.0, 6.0];
        let result = test_tost(&control, &experiment, &params(Theta::Fixed(0.5), true)).unwrap();
        assert!(!result.equivalent);
        assert!(result.p_upper > 0.5);
    }

    #[test]
    fn test_tost_identical_sets_are_equivalent() {
        let values = [20.1, 21.4, 19.8];
        for theta in [0.0, 0.1, 1.0, 10.0] {
            let result = test_tost(&values, &values, &params(Theta::Fixed(theta), true)).unwrap();
            assert!(result.equivalent, "theta = {}", theta);
        }
        let result =
            test_tost(&values, &values, &params(Theta::Auto { max: 5.0 }, true)).unwrap();
        assert!(result.equivalent);
    }

    #[test]
    fn test_tost_independent_identical_sets_are_equivalent() {
        let values = [20.1, 21.4, 19.8];
        let shuffled = [19.8, 20.1, 21.4];
        for theta in [0.0, 0.1, 0.5, 10.0] {
            let result =
                test_tost(&values, &shuffled, &params(Theta::Fixed(theta), false)).unwrap();
            assert!(result.equivalent, "theta = {}", theta);
            assert_eq!(result.p_tost, 0.0);
        }
        let result =
            test_tost(&values, &values, &params(Theta::Auto { max: 5.0 }, false)).unwrap();
        assert!(result.equivalent);
    }

    #[test]
    fn test_tost_independent_auto_theta() {
        // n1 = n2 = 3, both variances 1: sp = 1, df = 4, se = sqrt(2/3).
        // chi2(0.20; 4) = 1.648777, t(0.95; 4) = 2.131847, t(0.975; 4) = 2.776445
        let control = [1.0, 2.0, 3.0];
        let experiment = [2.0, 3.0, 4.0];
        let result =
            test_tost(&control, &experiment, &params(Theta::Auto { max: 8.0 }, false)).unwrap();

        assert_relative_eq!(result.difference, 1.0, epsilon = 1e-12);
        assert_relative_eq!(result.df, 4.0);
        assert_relative_eq!(result.std_error, 0.816497, epsilon = 1e-4);
        assert_relative_eq!(result.theta, 6.242145, epsilon = 1e-4);
        assert_relative_eq!(result.t_two, 1.224745, epsilon = 1e-4);
        assert_relative_eq!(result.p_two, 0.287864, epsilon = 1e-4);
        assert_relative_eq!(result.t_lower, 8.869780, epsilon = 1e-4);
        assert_relative_eq!(result.p_lower, 0.000446, epsilon = 1e-4);
        assert_relative_eq!(result.t_upper, -6.420290, epsilon = 1e-4);
        assert_relative_eq!(result.p_upper, 0.001513, epsilon = 1e-4);
        assert_relative_eq!(result.p_tost, result.p_upper);
        assert!(result.equivalent);
    }

    #[test]
    fn test_tost_independent_identical_sets_with_margin() {
        let values = [20.1, 21.4, 19.8];
        let result = test_tost(&values, &values, &params(Theta::Fixed(3.0), false)).unwrap();
        assert_relative_eq!(result.difference, 0.0);
        assert_relative_eq!(result.df, 4.0);
        assert_relative_eq!(result.p_lower, result.p_upper, epsilon = 1e-12);
        assert!(result.equivalent);
    }

    #[test]
    fn test_auto_theta_is_clipped() {
        let control = [1.0, 5.0, 9.0];
        let experiment = [2.0, 1.0, 12.0];
        let result =
            test_tost(&control, &experiment, &params(Theta::Auto { max: 0.5 }, false)).unwrap();
        assert_relative_eq!(result.theta, 0.5);
    }

    #[test]
    fn test_auto_theta_formula() {
        let theta = auto_theta(1.0, 4.0, 1.0, 0.05, 0.05, 0.8, f64::INFINITY);
        let chi = dist::chi2_quantile(0.2, 4.0);
        let expected = (dist::t_quantile(0.95, 4.0) + dist::t_quantile(0.975, 4.0))
            * (4.0 / chi).sqrt();
        assert_relative_eq!(theta, expected, epsilon = 1e-12);
        assert!(theta > 0.0);
    }

    #[test]
    fn test_tost_rejects_bad_params() {
        let mut p = params(Theta::Fixed(-1.0), true);
        assert!(test_tost(&[1.0], &[1.0], &p).is_err());
        p.theta = Theta::Fixed(1.0);
        p.gamma = 1.0;
        assert!(test_tost(&[1.0], &[1.0], &p).is_err());
    }
}
