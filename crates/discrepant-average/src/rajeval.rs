//! Rajeval Technique (RT)
//!
//! Two stages: a leave-one-out jackknife test flags gross outliers for
//! the decision policy, then points statistically inconsistent with the
//! internal-uncertainty weighted mean have that mean's uncertainty added
//! to theirs in quadrature, repeatedly, until the set is consistent.

use crate::decision::{AutoKeep, DecisionPolicy};
use crate::unweighted::UnweightedAverage;
use crate::weighted::weighted_fit;
use crate::weights::degenerate_consensus;
use crate::DEFAULT_CHI_CONFIDENCE;
use discrepant_core::{Error, Measurement, Report, Result};
use discrepant_numeric::chi_square;
use tracing::debug;

const METHOD: &str = "Rajeval Technique";

/// Confidence level at which stage 1 asks to reject an outlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RejectionConfidence {
    /// 95% (1.96 sigma)
    P95,
    /// 99% (2 x 1.96 sigma)
    #[default]
    P99,
    /// 99.99% (3 x 1.96 sigma)
    P9999,
}

impl RejectionConfidence {
    fn multiplier(self) -> f64 {
        match self {
            Self::P95 => 1.0,
            Self::P99 => 2.0,
            Self::P9999 => 3.0,
        }
    }
}

/// The RT estimator.
#[derive(Debug, Clone)]
pub struct Rajeval<P = AutoKeep> {
    policy: P,
    confidence: RejectionConfidence,
}

impl Rajeval<AutoKeep> {
    /// RT at 99% rejection confidence with the keep-everything policy.
    pub fn new() -> Self {
        Self {
            policy: AutoKeep,
            confidence: RejectionConfidence::P99,
        }
    }
}

impl Default for Rajeval<AutoKeep> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: DecisionPolicy> Rajeval<P> {
    /// Replace the outlier decision policy.
    pub fn with_policy<Q: DecisionPolicy>(self, policy: Q) -> Rajeval<Q> {
        Rajeval {
            policy,
            confidence: self.confidence,
        }
    }

    /// Confidence level for stage-1 outlier rejection.
    pub fn with_confidence(mut self, confidence: RejectionConfidence) -> Self {
        self.confidence = confidence;
        self
    }

    /// Compute the RT average.
    pub fn average(&self, data: &[Measurement]) -> Result<Measurement> {
        Ok(self.average_with_report(data)?.0)
    }

    /// Compute the RT average and its diagnostic report.
    pub fn average_with_report(&self, data: &[Measurement]) -> Result<(Measurement, Report)> {
        const MAX_PASSES: usize = 5000;

        let n = data.len();
        if n < 2 {
            return Err(Error::insufficient(2, n));
        }
        let n_f = n as f64;

        let mut report = Report::new(METHOD, data);

        if let Some(exact) = degenerate_consensus(data)? {
            let result = exact.with_name("RT");
            report.means = vec![result.clone()];
            return Ok((result, report));
        }

        // Stage 1: leave-one-out jackknife outlier test. Runs only while
        // at least four points would survive, so small sets skip it.
        let threshold = 1.96 * self.confidence.multiplier();
        let unweighted = UnweightedAverage::new().average(data)?;
        let mut removed: Vec<usize> = Vec::new();
        for i in 0..n {
            if n - removed.len() < 4 {
                break;
            }
            let reduced_mean =
                unweighted.value * n_f / (n_f - 1.0) - data[i].value / (n_f - 1.0);
            let reduced_sd_sq = (n_f / (n_f - 2.0)) * unweighted.variance()
                - n_f * (unweighted.value - data[i].value).powi(2)
                    / ((n_f - 1.0) * (n_f - 1.0) * (n_f - 2.0));
            let statistic =
                (data[i].value - reduced_mean) / (data[i].variance() + reduced_sd_sq).sqrt();
            if statistic.abs() > threshold && self.policy.remove_outlier(METHOD, &data[i]) {
                debug!(index = i, statistic, "outlier removed");
                removed.push(i);
            }
        }

        let mut working: Vec<Measurement> = (0..n)
            .filter(|i| !removed.contains(i))
            .map(|i| data[i].clone())
            .collect();
        let m = working.len();
        let m_f = m as f64;
        report.outliers = removed;

        // Stage 2: inflate the uncertainty of inconsistent points by the
        // weighted mean's own uncertainty, in quadrature, until stable.
        let critical = 0.5_f64.powf(m_f / (m_f - 1.0));
        let standard_normal = Measurement::default();
        let mut changed: Vec<usize> = Vec::new();
        for _ in 0..MAX_PASSES {
            let mean = weighted_fit(&working, true)?.result;
            let mean_variance = mean.variance();
            let mut adjusted = false;
            for i in 0..m {
                let statistic = (working[i].value - mean.value)
                    / (working[i].variance() - mean_variance).sqrt();
                // A NaN statistic (point variance below the mean's) never
                // triggers an adjustment.
                if (standard_normal.cdf(statistic) - 0.5).abs() > critical {
                    if !changed.contains(&i) {
                        changed.push(i);
                    }
                    working[i].lower =
                        (working[i].lower.powi(2) + mean.lower.powi(2)).sqrt();
                    working[i].upper =
                        (working[i].upper.powi(2) + mean.upper.powi(2)).sqrt();
                    debug!(index = i, statistic, "uncertainty inflated");
                    adjusted = true;
                }
            }
            if !adjusted {
                break;
            }
        }

        let fit = weighted_fit(&working, false)?;
        let result = fit.result.with_name("RT");

        report.relative_weights = Some(fit.relative_weights);
        report.point_chi_square = Some(fit.point_chi_square);
        report.reduced_chi_square = Some(fit.reduced_chi_square);
        report.critical_chi_square =
            Some(chi_square::global().critical(m - 1, DEFAULT_CHI_CONFIDENCE, true));
        report.rejection_confidence = Some(100.0 * DEFAULT_CHI_CONFIDENCE);
        report.means = vec![
            fit.internal.with_name("RT (Internal Uncertainty)"),
            fit.external.with_name("RT (External Uncertainty)"),
        ];
        report.adjusted = Some(working);
        report.adjusted_points = changed;

        Ok((result, report))
    }
}
