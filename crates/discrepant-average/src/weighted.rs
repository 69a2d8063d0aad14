//! Maximum-likelihood weighted average with asymmetric weighting
//!
//! Each point is weighted by `1/lower^2` when it lies above the candidate
//! mean and `1/upper^2` when below, so the mean is the fixed point of
//! `f(mu) = sum(w_i(mu) x_i) / sum(w_i(mu))`. The fixed point is found as
//! a root of `f(mu) - mu`; when no sign change brackets it, the
//! log-likelihood is maximized directly. The 1-sigma bounds are the
//! profile-likelihood interval: the points where the log-likelihood drops
//! 0.5 below its maximum.

use crate::weights::{degenerate_consensus, weighted_chi_square};
use crate::DEFAULT_CHI_CONFIDENCE;
use discrepant_core::math::{max_value, min_value};
use discrepant_core::{Error, Measurement, Report, Result};
use discrepant_numeric::chi_square;
use discrepant_numeric::{find_max, uniroot};
use tracing::debug;

/// Everything one weighted fit produces; the estimators that build on the
/// weighted average share this.
#[derive(Debug, Clone)]
pub(crate) struct WeightedFit {
    /// Result carrying the profile-likelihood (internal) uncertainty
    pub internal: Measurement,
    /// Result with the internal uncertainty scaled by sqrt(reduced chi^2)
    pub external: Measurement,
    /// The reported result after the internal/external selection
    pub result: Measurement,
    pub reduced_chi_square: f64,
    pub relative_weights: Vec<f64>,
    pub point_chi_square: Vec<f64>,
}

pub(crate) fn weighted_fit(data: &[Measurement], force_internal: bool) -> Result<WeightedFit> {
    let n = data.len();
    if n < 2 {
        return Err(Error::insufficient(2, n));
    }
    let n_f = n as f64;

    if let Some(exact) = degenerate_consensus(data)? {
        // An exact measurement pins the mean; the others only contribute
        // to the consistency statistic.
        let exact_count = data.iter().filter(|m| m.is_exact()).count();
        let result = exact.with_name("Weighted Average");
        return Ok(WeightedFit {
            internal: result.clone(),
            external: result.clone(),
            reduced_chi_square: weighted_chi_square(data, result.value) / (n_f - 1.0),
            relative_weights: data
                .iter()
                .map(|m| {
                    if m.is_exact() {
                        1.0 / exact_count as f64
                    } else {
                        0.0
                    }
                })
                .collect(),
            point_chi_square: data
                .iter()
                .map(|m| {
                    if m.is_exact() {
                        0.0
                    } else {
                        weighted_chi_square(std::slice::from_ref(m), result.value)
                    }
                })
                .collect(),
            result,
        });
    }

    let values: Vec<f64> = data.iter().map(|m| m.value).collect();

    let weights_at = |mu: f64| -> Vec<f64> {
        data.iter()
            .map(|m| {
                if m.value > mu {
                    1.0 / (m.lower * m.lower)
                } else {
                    1.0 / (m.upper * m.upper)
                }
            })
            .collect()
    };

    // The weighted mean is the fixed point of this map.
    let fixed_point = |mu: f64| -> f64 {
        let w = weights_at(mu);
        let total: f64 = w.iter().sum();
        values
            .iter()
            .zip(&w)
            .map(|(&x, &wi)| wi * x)
            .sum::<f64>()
            / total
    };

    let gap = |mu: f64| fixed_point(mu) - mu;

    let log_likelihood = |mu: f64| -> f64 {
        let w = weights_at(mu);
        -0.5 * values
            .iter()
            .zip(&w)
            .map(|(&x, &wi)| (x - mu) * (x - mu) * wi)
            .sum::<f64>()
    };

    let lo = min_value(&values);
    let hi = max_value(&values);
    let mu_max = match uniroot(gap, lo, hi) {
        Ok(mu) => mu,
        Err(Error::NoBracket { .. }) => {
            // No sign change: locate the likelihood maximum directly.
            debug!(lo, hi, "no bracket for the weighted-mean fixed point");
            find_max(&log_likelihood, lo, hi)
        }
        Err(e) => return Err(e),
    };

    // 1-sigma interval: log-likelihood 0.5 below its maximum.
    let peak = log_likelihood(mu_max);
    let likelihood_drop = |mu: f64| log_likelihood(mu) - (peak - 0.5);
    let search_lo = data
        .iter()
        .map(|m| m.value - 3.0 * m.lower)
        .fold(f64::INFINITY, f64::min);
    let search_hi = data
        .iter()
        .map(|m| m.value + 3.0 * m.upper)
        .fold(f64::NEG_INFINITY, f64::max);

    let lower_uncert = mu_max - uniroot(&likelihood_drop, search_lo, mu_max)?;
    let upper_uncert = uniroot(&likelihood_drop, mu_max, search_hi)? - mu_max;

    let reduced_chi_square = weighted_chi_square(data, mu_max) / (n_f - 1.0);
    let weights = weights_at(mu_max);
    let total: f64 = weights.iter().sum();
    let relative_weights: Vec<f64> = weights.iter().map(|w| w / total).collect();
    let point_chi_square: Vec<f64> = values
        .iter()
        .zip(&weights)
        .map(|(&x, &w)| (mu_max - x).powi(2) * w)
        .collect();

    let internal = Measurement::named(mu_max, upper_uncert, lower_uncert, "Weighted Average");
    let scale = reduced_chi_square.sqrt();
    let external = Measurement::named(
        mu_max,
        scale * upper_uncert,
        scale * lower_uncert,
        "Weighted Average",
    );

    let result = if internal.variance() < external.variance() && !force_internal {
        external.clone()
    } else {
        internal.clone()
    };

    Ok(WeightedFit {
        internal,
        external,
        result,
        reduced_chi_square,
        relative_weights,
        point_chi_square,
    })
}

/// The maximum-likelihood weighted average.
#[derive(Debug, Clone, Copy)]
pub struct WeightedAverage {
    force_internal: bool,
    chi_confidence: f64,
}

impl WeightedAverage {
    /// Create the estimator with the external-uncertainty selection
    /// enabled and a 95% critical chi-square in the report.
    pub fn new() -> Self {
        Self {
            force_internal: false,
            chi_confidence: DEFAULT_CHI_CONFIDENCE,
        }
    }

    /// Always report the internal (profile-likelihood) uncertainty, even
    /// when the external one is larger.
    pub fn with_internal_uncertainty(mut self) -> Self {
        self.force_internal = true;
        self
    }

    /// Confidence level for the critical chi-square quoted in the report.
    pub fn with_chi_confidence(mut self, confidence: f64) -> Self {
        assert!(
            confidence > 0.0 && confidence < 1.0,
            "Confidence level must be in (0, 1)"
        );
        self.chi_confidence = confidence;
        self
    }

    /// Compute the weighted average.
    pub fn average(&self, data: &[Measurement]) -> Result<Measurement> {
        Ok(weighted_fit(data, self.force_internal)?.result)
    }

    /// Compute the weighted average and its diagnostic report.
    pub fn average_with_report(&self, data: &[Measurement]) -> Result<(Measurement, Report)> {
        let fit = weighted_fit(data, self.force_internal)?;

        let mut report = Report::new("Weighted Average", data);
        report.means = vec![
            fit.internal
                .clone()
                .with_name("Weighted Average (Internal Uncertainty)"),
            fit.external
                .clone()
                .with_name("Weighted Average (External Uncertainty)"),
        ];
        report.reduced_chi_square = Some(fit.reduced_chi_square);
        report.critical_chi_square = Some(chi_square::global().critical(
            data.len() - 1,
            self.chi_confidence,
            true,
        ));
        report.rejection_confidence = Some(100.0 * self.chi_confidence);
        report.relative_weights = Some(fit.relative_weights);
        report.point_chi_square = Some(fit.point_chi_square);

        Ok((fit.result, report))
    }
}

impl Default for WeightedAverage {
    fn default() -> Self {
        Self::new()
    }
}
