//! Thin wrappers over `statrs` distributions.
//!
//! Invalid parameters (non-positive degrees of freedom, NaN statistics)
//! produce NaN instead of an error so that a degenerate row propagates NaN
//! rather than aborting a whole analysis.

use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor, StudentsT};

fn students_t(df: f64) -> Option<StudentsT> {
    if !(df > 0.0) {
        return None;
    }
    StudentsT::new(0.0, 1.0, df).ok()
}

/// P(T <= t) for Student's t with `df` degrees of freedom.
pub(crate) fn t_cdf(t: f64, df: f64) -> f64 {
    if t.is_nan() {
        return f64::NAN;
    }
    students_t(df).map_or(f64::NAN, |d| d.cdf(t))
}

/// P(T > t) for Student's t with `df` degrees of freedom.
pub(crate) fn t_sf(t: f64, df: f64) -> f64 {
    if t.is_nan() {
        return f64::NAN;
    }
    students_t(df).map_or(f64::NAN, |d| d.sf(t))
}

/// Two-sided p-value of a t statistic.
pub(crate) fn t_two_sided(t: f64, df: f64) -> f64 {
    (2.0 * t_sf(t.abs(), df)).min(1.0)
}

/// Quantile of Student's t.
pub(crate) fn t_quantile(p: f64, df: f64) -> f64 {
    if !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    students_t(df).map_or(f64::NAN, |d| d.inverse_cdf(p))
}

/// P(X > x) for the chi-square distribution.
pub(crate) fn chi2_sf(x: f64, df: f64) -> f64 {
    if x.is_nan() || !(df > 0.0) {
        return f64::NAN;
    }
    ChiSquared::new(df).map_or(f64::NAN, |d| d.sf(x))
}

/// Quantile of the chi-square distribution.
pub(crate) fn chi2_quantile(p: f64, df: f64) -> f64 {
    if !(0.0..=1.0).contains(&p) || !(df > 0.0) {
        return f64::NAN;
    }
    ChiSquared::new(df).map_or(f64::NAN, |d| d.inverse_cdf(p))
}

/// P(F <= f) for the F distribution.
pub(crate) fn f_cdf(f: f64, df1: f64, df2: f64) -> f64 {
    if f.is_nan() || !(df1 > 0.0) || !(df2 > 0.0) {
        return f64::NAN;
    }
    FisherSnedecor::new(df1, df2).map_or(f64::NAN, |d| d.cdf(f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_t_df2_closed_form() {
        // For df = 2: F(t) = 1/2 + t / (2 sqrt(2 + t^2))
        let t: f64 = 1.5;
        let expected = 0.5 + t / (2.0 * (2.0 + t * t).sqrt());
        assert_relative_eq!(t_cdf(t, 2.0), expected, epsilon = 1e-9);
        assert_relative_eq!(t_sf(t, 2.0), 1.0 - expected, epsilon = 1e-9);
    }

    #[test]
    fn test_chi2_df2_closed_form() {
        // For df = 2: P(X > x) = exp(-x / 2)
        assert_relative_eq!(chi2_sf(3.0, 2.0), (-1.5f64).exp(), epsilon = 1e-9);
    }

    #[test]
    fn test_quantile_inverts_cdf() {
        let q = t_quantile(0.95, 5.0);
        assert_relative_eq!(t_cdf(q, 5.0), 0.95, epsilon = 1e-6);
        let c = chi2_quantile(0.2, 4.0);
        assert_relative_eq!(1.0 - chi2_sf(c, 4.0), 0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_invalid_parameters_give_nan() {
        assert!(t_sf(1.0, 0.0).is_nan());
        assert!(t_sf(f64::NAN, 3.0).is_nan());
        assert!(chi2_sf(1.0, 0.0).is_nan());
        assert!(f_cdf(1.0, 0.0, 2.0).is_nan());
    }
}
