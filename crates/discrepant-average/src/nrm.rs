//! Normalized Residuals Method (NRM)
//!
//! Any point whose normalized residual exceeds a critical value derived
//! from the confidence level has its uncertainty inflated by exactly the
//! ratio that brings the residual down to critical; mean and residuals
//! are recomputed and the largest offender treated next, on an
//! engine-owned working copy.

use crate::weighted::weighted_fit;
use crate::weights::{degenerate_consensus, normalized_residuals, variance_weights};
use crate::DEFAULT_CHI_CONFIDENCE;
use discrepant_core::math::arg_max;
use discrepant_core::{Error, Measurement, Report, Result};
use discrepant_numeric::chi_square;
use tracing::debug;

const METHOD: &str = "Normalized Residuals Method";

/// The NRM estimator.
#[derive(Debug, Clone, Copy)]
pub struct Nrm {
    confidence: f64,
}

impl Nrm {
    /// NRM at the default 99% confidence level.
    pub fn new() -> Self {
        Self { confidence: 0.99 }
    }

    /// Confidence level controlling the critical residual; closer to 1
    /// means a higher critical residual and fewer adjustments.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        assert!(
            confidence > 0.0 && confidence < 1.0,
            "Confidence level must be in (0, 1)"
        );
        self.confidence = confidence;
        self
    }

    /// Compute the NRM average.
    pub fn average(&self, data: &[Measurement]) -> Result<Measurement> {
        Ok(self.average_with_report(data)?.0)
    }

    /// Compute the NRM average and its diagnostic report.
    pub fn average_with_report(&self, data: &[Measurement]) -> Result<(Measurement, Report)> {
        const MAX_ITERATIONS: usize = 5000;

        let n = data.len();
        if n < 2 {
            return Err(Error::insufficient(2, n));
        }
        let n_f = n as f64;

        let mut report = Report::new(METHOD, data);

        if let Some(exact) = degenerate_consensus(data)? {
            let result = exact.with_name("NRM");
            report.means = vec![result.clone()];
            return Ok((result, report));
        }

        let outlier_probability = (100.0 * (1.0 - self.confidence)).min(n_f);
        let critical = (1.8 * (n_f / outlier_probability).ln() + 2.6).sqrt();

        let mut working: Vec<Measurement> = data.to_vec();
        let mut weights = variance_weights(&working);
        let mut total: f64 = weights.iter().sum();
        let mut mean = weighted_fit(&working, false)?.result.value;
        let mut residuals = normalized_residuals(&working, &weights, mean);

        let mut changed: Vec<usize> = Vec::new();
        for _ in 0..MAX_ITERATIONS {
            let magnitudes: Vec<f64> = residuals.iter().map(|r| r.abs()).collect();
            let i = arg_max(&magnitudes);
            if magnitudes[i] <= critical {
                break;
            }
            if !changed.contains(&i) {
                changed.push(i);
            }

            // Scale the weight so the residual lands exactly on critical.
            let r2 = residuals[i] * residuals[i];
            let c2 = critical * critical;
            let adjustment = 1.0 - total * (r2 - c2) / (total * r2 - weights[i] * c2);
            weights[i] *= adjustment;
            working[i].lower /= adjustment.sqrt();
            working[i].upper /= adjustment.sqrt();
            debug!(index = i, residual = residuals[i], adjustment, "residual adjusted");

            total = weights.iter().sum();
            mean = weighted_fit(&working, false)?.result.value;
            residuals = normalized_residuals(&working, &weights, mean);
        }

        let fit = weighted_fit(&working, false)?;
        let result = fit.result.with_name("NRM");

        report.relative_weights = Some(fit.relative_weights);
        report.point_chi_square = Some(fit.point_chi_square);
        report.normalized_residuals = Some(residuals);
        report.reduced_chi_square = Some(fit.reduced_chi_square);
        report.critical_chi_square =
            Some(chi_square::global().critical(n - 1, DEFAULT_CHI_CONFIDENCE, true));
        report.rejection_confidence = Some(100.0 * DEFAULT_CHI_CONFIDENCE);
        report.means = vec![
            fit.internal.with_name("NRM (Internal Uncertainty)"),
            fit.external.with_name("NRM (External Uncertainty)"),
        ];
        report.adjusted = Some(working);
        report.adjusted_points = changed;

        Ok((result, report))
    }
}

impl Default for Nrm {
    fn default() -> Self {
        Self::new()
    }
}
