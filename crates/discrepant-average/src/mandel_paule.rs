//! Mandel-Paule method
//!
//! Models the scatter beyond the quoted uncertainties as one extra
//! between-measurement variance `y`, shared by every point: weights are
//! `1/(y + var_i)` and `y` solves `sum(w_i (x_i - mean_w)^2) = n - 1`.
//! The solution is found by bracket expansion and bisection; a negative
//! statistic at y = 0 means the quoted uncertainties already explain the
//! scatter.

use crate::unweighted::UnweightedAverage;
use crate::weighted::weighted_fit;
use crate::weights::{degenerate_consensus, weighted_chi_square};
use discrepant_core::math::weighted_mean;
use discrepant_core::{Error, Measurement, Report, Result};
use tracing::{debug, warn};

const METHOD: &str = "Mandel-Paule Method";

/// The Mandel-Paule estimator.
#[derive(Debug, Clone, Copy)]
pub struct MandelPaule {
    precision: f64,
    max_iterations: usize,
}

impl MandelPaule {
    /// Mandel-Paule with bisection precision 1e-12 and at most 1000
    /// iterations.
    pub fn new() -> Self {
        Self {
            precision: 1e-12,
            max_iterations: 1000,
        }
    }

    /// Bisection precision: the algorithm stops once the variance
    /// statistic is this close to zero.
    pub fn with_precision(mut self, precision: f64) -> Self {
        assert!(precision > 0.0, "Precision must be positive");
        self.precision = precision;
        self
    }

    /// Maximum number of bisection iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        assert!(max_iterations > 0, "Need at least one iteration");
        self.max_iterations = max_iterations;
        self
    }

    /// Compute the Mandel-Paule average.
    pub fn average(&self, data: &[Measurement]) -> Result<Measurement> {
        Ok(self.average_with_report(data)?.0)
    }

    /// Compute the Mandel-Paule average and its diagnostic report.
    pub fn average_with_report(&self, data: &[Measurement]) -> Result<(Measurement, Report)> {
        let n = data.len();
        if n < 2 {
            return Err(Error::insufficient(2, n));
        }
        let n_f = n as f64;

        let mut report = Report::new(METHOD, data);

        if let Some(exact) = degenerate_consensus(data)? {
            let result = exact.with_name("Mandel-Paule");
            report.means = vec![result.clone()];
            return Ok((result, report));
        }

        let values: Vec<f64> = data.iter().map(|m| m.value).collect();
        let variances: Vec<f64> = data.iter().map(|m| m.variance()).collect();

        let weights_at =
            |y: f64| -> Vec<f64> { variances.iter().map(|&v| 1.0 / (y + v)).collect() };
        // Zero for the correct extra variance; monotonically decreasing.
        let statistic = |y: f64| -> f64 {
            let w = weights_at(y);
            let mean = weighted_mean(&values, &w);
            values
                .iter()
                .zip(&w)
                .map(|(&x, &wi)| wi * (x - mean) * (x - mean))
                .sum::<f64>()
                - (n_f - 1.0)
        };

        let y = if statistic(0.0) < 0.0 {
            // The root would be negative: the quoted uncertainties already
            // cover the observed scatter.
            0.0
        } else {
            let unweighted = UnweightedAverage::new().average(data)?;
            let mut y_lower = 0.0_f64;
            let mut y_upper = n_f * unweighted.variance();
            let mut f_upper = statistic(y_upper);
            if f_upper > 0.0 {
                y_lower = y_upper;
                while f_upper > 0.0 {
                    y_upper *= 1.1;
                    f_upper = statistic(y_upper);
                }
            }
            debug!(y_lower, y_upper, "bisecting for the extra variance");

            let mut y_mid = 0.5 * (y_lower + y_upper);
            let mut converged = false;
            for _ in 0..self.max_iterations {
                y_mid = 0.5 * (y_lower + y_upper);
                let f_mid = statistic(y_mid);
                if f_mid.abs() < self.precision {
                    converged = true;
                    break;
                }
                if f_mid < 0.0 {
                    y_upper = y_mid;
                } else {
                    y_lower = y_mid;
                }
            }
            if !converged {
                warn!(
                    max_iterations = self.max_iterations,
                    "bisection did not converge; result may not be optimal"
                );
            }
            y_mid
        };

        let weights = weights_at(y);
        let value = weighted_mean(&values, &weights);

        // The larger of the extra-variance estimate and the weighted
        // average's own uncertainty wins.
        let weighted = weighted_fit(data, false)?.result;
        let result = if y > weighted.variance() {
            Measurement::named(value, y.sqrt(), y.sqrt(), "Mandel-Paule")
        } else {
            Measurement::named(value, weighted.upper, weighted.lower, "Mandel-Paule")
        };

        let total: f64 = weights.iter().sum();
        report.means = vec![result.clone()];
        report.relative_weights = Some(weights.iter().map(|w| w / total).collect());
        report.reduced_chi_square =
            Some(weighted_chi_square(data, result.value) / (n_f - 1.0));

        Ok((result, report))
    }
}

impl Default for MandelPaule {
    fn default() -> Self {
        Self::new()
    }
}
