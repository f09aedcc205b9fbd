//! Family-wise error rate corrections.

/// Bonferroni: p * n, capped at 1. NaN p-values are not counted.
pub fn correct_bonferroni(p_values: &[f64]) -> Vec<f64> {
    let n = p_values.iter().filter(|p| !p.is_nan()).count() as f64;
    p_values
        .iter()
        .map(|&p| if p.is_nan() { p } else { (p * n).min(1.0) })
        .collect()
}

/// Holm step-down: sorted p[i] * (n - i), made monotone and capped at 1.
pub fn correct_holm(p_values: &[f64]) -> Vec<f64> {
    let mut adjusted = vec![f64::NAN; p_values.len()];
    let mut indices: Vec<usize> = (0..p_values.len())
        .filter(|&i| !p_values[i].is_nan())
        .collect();
    indices.sort_by(|&a, &b| p_values[a].total_cmp(&p_values[b]));

    let n = indices.len();
    let mut running_max: f64 = 0.0;
    for (rank, &idx) in indices.iter().enumerate() {
        let value = (p_values[idx] * (n - rank) as f64).min(1.0);
        running_max = running_max.max(value);
        adjusted[idx] = running_max;
    }
    adjusted
}
