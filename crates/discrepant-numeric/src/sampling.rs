//! Random draws for the resampling estimators
//!
//! All generators are parameterized over a [`rand::Rng`] so callers can
//! inject a seeded generator for reproducibility.

use rand::Rng;
use rand_distr::StandardNormal;

/// One draw from Uniform[0, 1).
pub fn uniform<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen::<f64>()
}

/// One draw from Normal(mean, sd).
pub fn normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, sd: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    mean + sd * z
}

/// One draw from the asymmetric normal distribution peaked at `peak` with
/// standard deviation `lower_sd` below the peak and `upper_sd` above it.
///
/// The side is chosen with probability `lower_sd / (lower_sd + upper_sd)`
/// for the lower branch; the magnitude is a folded normal of the side's
/// standard deviation.
pub fn asymmetric_normal<R: Rng + ?Sized>(
    rng: &mut R,
    peak: f64,
    lower_sd: f64,
    upper_sd: f64,
) -> f64 {
    if rng.gen::<f64>() < lower_sd / (lower_sd + upper_sd) {
        peak - normal(rng, 0.0, lower_sd).abs()
    } else {
        peak + normal(rng, 0.0, upper_sd).abs()
    }
}

/// `k` distinct indices drawn uniformly from `0..n`, via a partial
/// Fisher-Yates shuffle.
///
/// # Panics
/// Panics if `k > n`.
pub fn sample_indices<R: Rng + ?Sized>(rng: &mut R, n: usize, k: usize) -> Vec<usize> {
    assert!(k <= n, "cannot draw {k} distinct indices from 0..{n}");
    let mut pool: Vec<usize> = (0..n).collect();
    let mut result = Vec::with_capacity(k);
    let mut remaining = n;
    for _ in 0..k {
        let i = rng.gen_range(0..remaining);
        result.push(pool[i]);
        pool[i] = pool[remaining - 1];
        remaining -= 1;
    }
    result
}
