//! Benjamini-Hochberg false discovery rate correction.

/// Apply Benjamini-Hochberg FDR correction.
///
/// For each p-value, the adjusted p-value (q-value) is calculated as:
/// q[i] = min(p[i] * n / rank[i], q[i+1])
///
/// NaN p-values are not counted as tests and stay NaN.
///
/// # Arguments
/// * `p_values` - Raw p-values
///
/// # Returns
/// Adjusted p-values in the original order.
pub fn correct_bh(p_values: &[f64]) -> Vec<f64> {
    let mut q_values = vec![f64::NAN; p_values.len()];

    // Sorted index over tested (non-NaN) p-values
    let mut indices: Vec<usize> = (0..p_values.len())
        .filter(|&i| !p_values[i].is_nan())
        .collect();
    let n = indices.len();
    if n == 0 {
        return q_values;
    }
    indices.sort_by(|&a, &b| p_values[a].total_cmp(&p_values[b]));

    let mut q_sorted = vec![0.0; n];
    let n_f64 = n as f64;

    // Start from largest p-value
    q_sorted[n - 1] = p_values[indices[n - 1]].min(1.0);

    // Work backwards
    for i in (0..n - 1).rev() {
        let rank = i + 1;
        let adjusted = p_values[indices[i]] * n_f64 / rank as f64;
        q_sorted[i] = adjusted.min(q_sorted[i + 1]).min(1.0);
    }

    // Restore original order
    for (i, &orig_idx) in indices.iter().enumerate() {
        q_values[orig_idx] = q_sorted[i];
    }

    q_values
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bh_ordering() {
        // P-values in non-sorted order
        let q = correct_bh(&[0.04, 0.01, 0.03, 0.005]);

        // Smallest p-value (0.005 at index 3): q = 0.005 * 4 / 1 = 0.02
        assert_relative_eq!(q[3], 0.02, epsilon = 1e-10);
        // Second smallest (0.01 at index 1): min(0.01 * 4 / 2, q[next]) = 0.02
        assert_relative_eq!(q[1], 0.02, epsilon = 1e-10);
    }

    #[test]
    fn test_bh_known_values() {
        let q = correct_bh(&[0.005, 0.01, 0.02, 0.04, 0.1]);

        // Rank 1: 0.005 * 5/1 = 0.025
        // Rank 2: 0.01 * 5/2 = 0.025
        // Rank 3: 0.02 * 5/3 = 0.0333
        // Rank 4: 0.04 * 5/4 = 0.05
        // Rank 5: 0.1 * 5/5 = 0.1
        assert_relative_eq!(q[0], 0.025, epsilon = 1e-10);
        assert_relative_eq!(q[1], 0.025, epsilon = 1e-10);
        assert_relative_eq!(q[2], 1.0 / 30.0, epsilon = 1e-10);
        assert_relative_eq!(q[3], 0.05, epsilon = 1e-10);
        assert_relative_eq!(q[4], 0.1, epsilon = 1e-10);
    }

    #[test]
    fn test_bh_bounded() {
        for q in correct_bh(&[0.5, 0.6, 0.7, 0.8, 0.9]) {
            assert!(q <= 1.0);
        }
    }

    #[test]
    fn test_bh_nan_not_counted() {
        let q = correct_bh(&[0.01, f64::NAN, 0.02]);
        assert!(q[1].is_nan());
        // Two tests only: 0.01 * 2 / 1 = 0.02, 0.02 * 2 / 2 = 0.02
        assert_relative_eq!(q[0], 0.02, epsilon = 1e-10);
        assert_relative_eq!(q[2], 0.02, epsilon = 1e-10);
    }

    #[test]
    fn test_bh_empty() {
        assert!(correct_bh(&[]).is_empty());
    }
}
