//! Weight computation shared by the averaging estimators

use discrepant_core::{Error, Measurement, Result};

/// Weights proportional to `1/variance`, one per measurement.
pub fn variance_weights(data: &[Measurement]) -> Vec<f64> {
    data.iter().map(|m| 1.0 / m.variance()).collect()
}

/// Chi-square of the dataset with respect to `mean`, with the weight of
/// each point keyed to the sign of its deviation: a point above the mean
/// is weighted by `1/lower^2`, a point below by `1/upper^2`.
///
/// Degenerate (exact) measurements contribute nothing.
pub fn weighted_chi_square(data: &[Measurement], mean: f64) -> f64 {
    data.iter()
        .filter(|m| !m.is_exact())
        .map(|m| {
            let w = if m.value > mean {
                1.0 / (m.lower * m.lower)
            } else {
                1.0 / (m.upper * m.upper)
            };
            w * (m.value - mean).powi(2)
        })
        .sum()
}

/// Normalized residuals `sqrt(w_i * W / (W - w_i)) * (x_i - mean)` with
/// `W = sum(w_i)`.
pub fn normalized_residuals(data: &[Measurement], weights: &[f64], mean: f64) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    data.iter()
        .zip(weights)
        .map(|(m, &w)| (w * total / (total - w)).sqrt() * (m.value - mean))
        .collect()
}

/// Index of the most precise measurement: lowest variance, ties broken by
/// the central value farthest from `mean`.
pub fn most_precise(data: &[Measurement], mean: f64) -> usize {
    let mut best = 0;
    for i in 1..data.len() {
        let best_var = data[best].variance();
        let var = data[i].variance();
        if best_var > var {
            best = i;
        } else if best_var == var
            && (data[best].value - mean).abs() < (data[i].value - mean).abs()
        {
            best = i;
        }
    }
    best
}

/// If the dataset contains exact (degenerate-variance) measurements,
/// return the value they agree on; conflicting exact values are an error.
/// `None` when no measurement is exact, so `1/variance` weighting is safe.
pub(crate) fn degenerate_consensus(data: &[Measurement]) -> Result<Option<Measurement>> {
    let mut exact = data.iter().filter(|m| m.is_exact());
    let Some(first) = exact.next() else {
        return Ok(None);
    };
    if exact.all(|m| m.value == first.value) {
        Ok(Some(Measurement::new(first.value, 0.0, 0.0)))
    } else {
        Err(Error::InvalidInput(
            "dataset contains conflicting exact measurements".to_string(),
        ))
    }
}
