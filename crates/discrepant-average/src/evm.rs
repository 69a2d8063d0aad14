//! Expected Value Method (EVM)
//!
//! Each point is weighted by the mean probability density of the whole
//! dataset evaluated at its central value, a self-consistent kernel
//! weighting that needs no iteration. A chi-square-style hypothesis test
//! on the counts above and below the estimate gauges how well the EVM
//! assumption fits the data.

use discrepant_core::{Error, HypothesisTest, Measurement, Report, Result};
use discrepant_numeric::special::erf;

const METHOD: &str = "Expected Value Method";

/// Mean probability density of all measurements evaluated at `x`.
fn mean_density(data: &[Measurement], x: f64) -> f64 {
    data.iter().map(|m| m.density(x)).sum::<f64>() / data.len() as f64
}

/// The EVM estimator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpectedValue;

impl ExpectedValue {
    /// Create the estimator.
    pub fn new() -> Self {
        Self
    }

    /// Compute the EVM average.
    pub fn average(&self, data: &[Measurement]) -> Result<Measurement> {
        Ok(self.average_with_report(data)?.0)
    }

    /// Compute the EVM average and its diagnostic report.
    pub fn average_with_report(&self, data: &[Measurement]) -> Result<(Measurement, Report)> {
        let n = data.len();
        if n == 0 {
            return Err(Error::insufficient(1, 0));
        }
        let n_f = n as f64;

        let raw: Vec<f64> = data.iter().map(|m| mean_density(data, m.value)).collect();
        let total: f64 = raw.iter().sum();
        let weights: Vec<f64> = raw.iter().map(|w| w / total).collect();

        let value: f64 = data
            .iter()
            .zip(&weights)
            .map(|(m, &w)| w * m.value)
            .sum();
        let lower: f64 = data
            .iter()
            .zip(&weights)
            .map(|(m, &w)| (w * m.lower).powi(2))
            .sum::<f64>()
            .sqrt();
        let upper: f64 = data
            .iter()
            .zip(&weights)
            .map(|(m, &w)| (w * m.upper).powi(2))
            .sum::<f64>()
            .sqrt();
        let internal = Measurement::named(value, upper, lower, METHOD);

        // Scatter of the mean density around the estimate.
        let external = data
            .iter()
            .zip(&weights)
            .map(|(m, &w)| w * (value - m.value).powi(2))
            .sum::<f64>()
            .sqrt();

        let hypothesis = self.hypothesis_test(data, value);

        let mut report = Report::new(METHOD, data);
        report.means = vec![
            internal
                .clone()
                .with_name("EVM (Internal Uncertainty)"),
            Measurement::named(value, external, external, "EVM (External Uncertainty)"),
        ];
        report.relative_weights = Some(weights);
        report.hypothesis_test = Some(hypothesis);

        let result = if internal.variance() < external * external {
            Measurement::named(value, external, external, METHOD)
        } else {
            internal
        };

        Ok((result, report))
    }

    /// Modified chi-square test of the EVM assumption: compare observed
    /// counts above/below the estimate with the counts expected from the
    /// mean density.
    fn hypothesis_test(&self, data: &[Measurement], value: f64) -> HypothesisTest {
        let n = data.len();
        let n_f = n as f64;

        let p_below = data.iter().map(|m| m.cdf(value)).sum::<f64>() / n_f;
        let p_above = 1.0 - p_below;
        let observed_below = data.iter().filter(|m| m.value < value).count();
        let observed_above = n - observed_below;

        let q = (observed_below as f64 - n_f * p_below).powi(2) / (n_f * p_below)
            + (observed_above as f64 - n_f * p_above).powi(2) / (n_f * p_above);

        HypothesisTest {
            p_below,
            p_above,
            observed_below,
            observed_above,
            q_statistic: q,
            confidence: 1.0 - erf((0.5 * q).sqrt()),
        }
    }
}
