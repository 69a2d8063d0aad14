//! Outlier criteria
//!
//! Four rejection rules, each a pure function from a dataset to the
//! indices of the points it would reject. Nothing here mutates or removes
//! anything; the estimators decide what to do with the flags (usually via
//! a [`DecisionPolicy`](crate::DecisionPolicy)).

use crate::unweighted::UnweightedAverage;
use crate::weighted::weighted_fit;
use discrepant_core::{Measurement, Result};
use discrepant_numeric::special::{erf, erf_inv, erfc};
use std::cmp::Ordering;
use std::f64::consts::SQRT_2;
use tracing::debug;

/// The outlier criterion an estimator should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutlierCriterion {
    #[default]
    Chauvenet,
    Peirce,
    ModifiedPeirce,
    Birch,
}

impl OutlierCriterion {
    /// Human-readable criterion name, as passed to decision policies.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Chauvenet => "Chauvenet",
            Self::Peirce => "Peirce",
            Self::ModifiedPeirce => "Modified Peirce",
            Self::Birch => "Birch",
        }
    }

    /// Run the criterion over the dataset.
    pub fn detect(&self, data: &[Measurement]) -> Result<Vec<usize>> {
        match self {
            Self::Chauvenet => chauvenet(data),
            Self::Peirce => peirce(data),
            Self::ModifiedPeirce => modified_peirce(data),
            Self::Birch => birch(data),
        }
    }
}

/// Indices of `0..n` sorted by normalized deviation from `mean`,
/// largest first.
fn by_descending_deviation(data: &[Measurement], mean: f64) -> Vec<usize> {
    let mut order: Vec<usize> = (0..data.len()).collect();
    order.sort_by(|&a, &b| {
        data[b]
            .normalized_deviation(mean)
            .partial_cmp(&data[a].normalized_deviation(mean))
            .unwrap_or(Ordering::Equal)
    });
    order
}

/// Chauvenet's criterion.
///
/// A point is rejected when its deviation from the arithmetic mean exceeds
/// `sqrt(2) * erf_inv((2n-1)/(2n))` standard deviations of the sample
/// (population-normalized); mean and deviation are recomputed on the
/// reduced set until no further point is rejected.
pub fn chauvenet(data: &[Measurement]) -> Result<Vec<usize>> {
    let mut alive: Vec<usize> = (0..data.len()).collect();
    let mut outliers = Vec::new();

    loop {
        if alive.is_empty() {
            break;
        }
        let n = alive.len() as f64;
        let mean = alive.iter().map(|&i| data[i].value).sum::<f64>() / n;
        let sd = (alive
            .iter()
            .map(|&i| (data[i].value - mean).powi(2))
            .sum::<f64>()
            / n)
            .sqrt();
        let max_deviation = SQRT_2 * erf_inv((2.0 * n - 1.0) / (2.0 * n)) * sd;

        let (rejected, kept): (Vec<usize>, Vec<usize>) = alive
            .iter()
            .copied()
            .partition(|&i| (data[i].value - mean).abs() > max_deviation);
        if rejected.is_empty() {
            break;
        }
        for &i in &rejected {
            debug!(index = i, mean, max_deviation, "Chauvenet rejection");
        }
        outliers.extend(rejected);
        alive = kept;
    }

    outliers.sort_unstable();
    Ok(outliers)
}

/// The maximum normalized deviation tolerated by Peirce's criterion for a
/// dataset of `num_points` assumed to contain `num_outliers`.
///
/// Solves the maximum-likelihood-ratio fixed point R -> lambda -> x -> R
/// to 1e-12.
pub fn peirce_threshold(num_points: usize, num_outliers: usize) -> f64 {
    const PRECISION: f64 = 1e-12;
    const MAX_ITERATIONS: usize = 1000;

    let n = num_points as f64;
    let m = num_outliers as f64;
    let n_ln_q = m * m.ln() + (n - m) * ((n - m).ln()) - n * n.ln();

    let mut r = 1.0_f64;
    let mut x = 0.0_f64;
    for _ in 0..MAX_ITERATIONS {
        let lambda = ((n_ln_q - m * r.ln()) / (n - m)).exp();
        x = (1.0 + (n - m - 1.0) * (1.0 - lambda * lambda) / m).sqrt();
        let new_r = (0.5 * (x * x - 1.0)).exp() * erfc(x / SQRT_2);
        if (r - new_r).abs() < PRECISION {
            break;
        }
        r = new_r;
    }
    x
}

/// Peirce's criterion.
///
/// Deviations are measured against the full-set arithmetic mean and
/// (Bessel-corrected) sample deviation; starting from one assumed
/// outlier, every point beyond [`peirce_threshold`] is marked and the
/// assumed count grows until no new point is marked. At least two points
/// always survive.
pub fn peirce(data: &[Measurement]) -> Result<Vec<usize>> {
    let n = data.len();
    if n < 3 {
        return Ok(Vec::new());
    }

    let unweighted = UnweightedAverage::new().average(data)?;
    let mean = unweighted.value;
    let sd = unweighted.lower * (n as f64).sqrt();

    let mut is_outlier = vec![false; n];
    let mut marked = 0usize;
    let mut assumed = 1usize;
    loop {
        let threshold = peirce_threshold(n, assumed);
        let mut new_marks = 0usize;
        for i in 0..n {
            if !is_outlier[i] && (data[i].value - mean).abs() / sd > threshold {
                if n - marked <= 2 {
                    break;
                }
                is_outlier[i] = true;
                marked += 1;
                new_marks += 1;
                debug!(index = i, threshold, "Peirce rejection");
            }
        }
        if new_marks == 0 {
            break;
        }
        assumed = marked + 1;
    }

    Ok((0..n).filter(|&i| is_outlier[i]).collect())
}

/// Modified Peirce's criterion.
///
/// Points are ranked by normalized deviation against the weighted mean;
/// the rank-m rejection threshold is `sqrt(2) * erf_inv(1 - k)` with
/// `k = m * exp(n/m - ln(n-m) - (n/m) ln n)`. Rejection stops once only
/// two points remain.
pub fn modified_peirce(data: &[Measurement]) -> Result<Vec<usize>> {
    let n = data.len();
    if n <= 2 {
        return Ok(Vec::new());
    }

    let mean = weighted_fit(data, false)?.result.value;
    let order = by_descending_deviation(data, mean);
    let norm_dev: Vec<f64> = order
        .iter()
        .map(|&i| data[i].normalized_deviation(mean))
        .collect();

    let mut outliers = Vec::new();
    let mut m = 1usize;
    loop {
        let nm = n as f64 / m as f64;
        let k = m as f64 * (nm - ((n - m) as f64).ln() - nm * (n as f64).ln()).exp();
        let r_max = SQRT_2 * erf_inv(1.0 - k);

        if r_max < norm_dev[m - 1] {
            while r_max < norm_dev[m - 1] && n - m > 1 {
                debug!(index = order[m - 1], r_max, "Modified Peirce rejection");
                outliers.push(order[m - 1]);
                m += 1;
            }
            if n - m <= 1 {
                break;
            }
        } else {
            break;
        }
    }

    Ok(outliers)
}

/// Birch's criterion against the weighted average with tolerance 0.99.
pub fn birch(data: &[Measurement]) -> Result<Vec<usize>> {
    let mean = weighted_fit(data, false)?.result;
    Ok(birch_against(data, &mean, 0.99))
}

/// Birch's criterion against an arbitrary mean.
///
/// A point is rejected when the probability that it deviates from the
/// given mean — both taken as normal with their quoted uncertainties —
/// exceeds the tolerance `k`. Points are scanned in decreasing normalized
/// deviation and rejection stops before fewer than three would remain.
pub fn birch_against(data: &[Measurement], mean: &Measurement, k: f64) -> Vec<usize> {
    let n = data.len();
    let mean_variance = mean.variance();
    let order = by_descending_deviation(data, mean.value);

    let mut outliers = Vec::new();
    let mut rejected = 0usize;
    for &i in &order {
        let deviation = (data[i].value - mean.value).abs();
        let total_variance = data[i].variance() + mean_variance;
        if 0.5 + 0.5 * erf(deviation / (2.0 * total_variance).sqrt()) > k {
            debug!(index = i, deviation, "Birch rejection");
            outliers.push(i);
            rejected += 1;
        }
        if n - rejected < 3 {
            break;
        }
    }
    outliers
}

/// The variance that `mean` must carry for `mean +/- sqrt(variance)` to be
/// consistent with every point of the dataset at the given probability
/// (a fraction in (0, 1)).
pub fn consistent_variance(mean: f64, data: &[Measurement], probability: f64) -> f64 {
    let k = erf_inv(2.0 * probability - 1.0).powi(2);
    data.iter()
        .map(|m| {
            let d = mean - m.value;
            d * d / (2.0 * k) - m.variance()
        })
        .fold(f64::NEG_INFINITY, f64::max)
}
