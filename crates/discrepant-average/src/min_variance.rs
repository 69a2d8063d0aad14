//! Consistent Minimum Variance method
//!
//! Finds the candidate mean that minimizes the variance it would need to
//! carry in order to be consistent with every measurement at the given
//! probability, via a ternary search over the range of central values.

use crate::outliers::consistent_variance;
use discrepant_core::{Error, Measurement, Report, Result};

const METHOD: &str = "Consistent Minimum Variance";

/// The consistent-minimum-variance estimator.
#[derive(Debug, Clone, Copy)]
pub struct MinimumVariance {
    probability: f64,
}

impl MinimumVariance {
    /// Minimum-variance search at the default 95% consistency probability.
    pub fn new() -> Self {
        Self { probability: 0.95 }
    }

    /// Probability (in (0, 1)) at which the mean must be consistent with
    /// each measurement.
    pub fn with_probability(mut self, probability: f64) -> Self {
        assert!(
            probability > 0.0 && probability < 1.0,
            "Probability must be in (0, 1)"
        );
        self.probability = probability;
        self
    }

    /// Compute the minimum-variance mean.
    pub fn average(&self, data: &[Measurement]) -> Result<Measurement> {
        const MAX_STEPS: usize = 1000;

        let n = data.len();
        if n == 0 {
            return Err(Error::insufficient(1, 0));
        }

        let mut lower = data
            .iter()
            .map(|m| m.value)
            .fold(f64::INFINITY, f64::min);
        let mut upper = data
            .iter()
            .map(|m| m.value)
            .fold(f64::NEG_INFINITY, f64::max);
        let min_input_variance = data
            .iter()
            .map(|m| m.variance())
            .fold(f64::INFINITY, f64::min);

        let precision = f64::MIN_POSITIVE.sqrt();
        let mut mean = 0.5 * (lower + upper);
        for _ in 0..MAX_STEPS {
            if upper - lower < precision {
                break;
            }
            let lower_third = lower + (upper - lower) / 3.0;
            let upper_third = upper - (upper - lower) / 3.0;
            if consistent_variance(lower_third, data, self.probability)
                > consistent_variance(upper_third, data, self.probability)
            {
                lower = lower_third;
            } else {
                upper = upper_third;
            }
            mean = 0.5 * (lower + upper);
        }

        let mut variance = consistent_variance(mean, data, self.probability);
        if variance < 0.0 {
            // Consistency asks for less variance than the best input
            // carries; fall back to that.
            variance = min_input_variance;
        }

        Ok(Measurement::named(
            mean,
            variance.sqrt(),
            variance.sqrt(),
            METHOD,
        ))
    }

    /// Compute the minimum-variance mean with a (minimal) report.
    pub fn average_with_report(&self, data: &[Measurement]) -> Result<(Measurement, Report)> {
        let result = self.average(data)?;
        let mut report = Report::new(METHOD, data);
        report.means = vec![result.clone()];
        Ok((result, report))
    }
}

impl Default for MinimumVariance {
    fn default() -> Self {
        Self::new()
    }
}
