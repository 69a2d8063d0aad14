//! Small numeric helpers shared across the workspace
//!
//! Slice reductions used by the estimators. NaN elements never win a
//! comparison, matching the strict `>`/`<` scans these helpers replace.

/// Index of the largest element of `x`. The first element wins ties.
///
/// # Panics
/// Panics if `x` is empty.
pub fn arg_max(x: &[f64]) -> usize {
    assert!(!x.is_empty(), "arg_max of empty slice");
    let mut best = 0;
    for (i, &v) in x.iter().enumerate().skip(1) {
        if v > x[best] {
            best = i;
        }
    }
    best
}

/// Index of the smallest element of `x`. The first element wins ties.
///
/// # Panics
/// Panics if `x` is empty.
pub fn arg_min(x: &[f64]) -> usize {
    assert!(!x.is_empty(), "arg_min of empty slice");
    let mut best = 0;
    for (i, &v) in x.iter().enumerate().skip(1) {
        if v < x[best] {
            best = i;
        }
    }
    best
}

/// Largest element of `x`.
pub fn max_value(x: &[f64]) -> f64 {
    x[arg_max(x)]
}

/// Smallest element of `x`.
pub fn min_value(x: &[f64]) -> f64 {
    x[arg_min(x)]
}

/// Weighted mean `sum(w[i] * x[i]) / sum(w[i])`.
pub fn weighted_mean(x: &[f64], weights: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), weights.len());
    let total: f64 = weights.iter().sum();
    x.iter()
        .zip(weights)
        .map(|(&xi, &wi)| xi * wi / total)
        .sum()
}

/// Unbiased sample variance of `x` around the given `mean`.
pub fn sample_variance(x: &[f64], mean: f64) -> f64 {
    let n = x.len();
    x.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1) as f64
}

/// Median of the values in `x`; sorts the slice in place.
///
/// For an even count the average of the middle pair is returned.
pub fn median(x: &mut [f64]) -> f64 {
    let n = x.len();
    x.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    if n % 2 == 0 {
        0.5 * (x[n / 2] + x[n / 2 - 1])
    } else {
        x[n / 2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_arg_max_min() {
        let x = [3.0, 7.0, 1.0, 7.0];
        assert_eq!(arg_max(&x), 1);
        assert_eq!(arg_min(&x), 2);
        assert_relative_eq!(max_value(&x), 7.0);
        assert_relative_eq!(min_value(&x), 1.0);
    }

    #[test]
    fn test_arg_max_ignores_nan() {
        let x = [1.0, f64::NAN, 2.0];
        assert_eq!(arg_max(&x), 2);
        assert_eq!(arg_min(&x), 0);
    }

    #[test]
    fn test_weighted_mean() {
        let x = [1.0, 3.0];
        let w = [1.0, 3.0];
        assert_relative_eq!(weighted_mean(&x, &w), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_sample_variance() {
        let x = [1.0, 2.0, 3.0];
        assert_relative_eq!(sample_variance(&x, 2.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_median_odd_even() {
        let mut odd = [3.0, 1.0, 2.0];
        assert_relative_eq!(median(&mut odd), 2.0);
        let mut even = [4.0, 1.0, 3.0, 2.0];
        assert_relative_eq!(median(&mut even), 2.5);
    }
}
