//! Limitation of Statistical Weights method (LWM)
//!
//! Outliers confirmed by the decision policy are removed first. If the
//! surviving set is consistent (reduced chi-square below the critical
//! value) the weighted mean stands. Otherwise no single measurement is
//! allowed to carry more than the configured share of the total
//! statistical weight: the worst offender's uncertainty is inflated until
//! its relative weight meets the limit, repeatedly, on an engine-owned
//! working copy. If the data remain inconsistent the policy may adopt the
//! unweighted mean; failing that, the final uncertainty is widened just
//! enough to overlap the most precise input measurement.

use crate::decision::{AutoKeep, DecisionPolicy};
use crate::outliers::OutlierCriterion;
use crate::unweighted::UnweightedAverage;
use crate::weighted::weighted_fit;
use crate::weights::{degenerate_consensus, most_precise};
use discrepant_core::{Error, Measurement, Report, Result};
use discrepant_numeric::chi_square;
use tracing::debug;

const METHOD: &str = "Limitation of Statistical Weights";

/// The LWM estimator.
#[derive(Debug, Clone)]
pub struct Lwm<P = AutoKeep> {
    policy: P,
    weight_limit: f64,
    criterion: OutlierCriterion,
    confidence: f64,
}

impl Lwm<AutoKeep> {
    /// LWM with the defaults: Chauvenet's criterion, a 50% weight limit,
    /// a 99% consistency confidence, and the keep-everything policy.
    pub fn new() -> Self {
        Self {
            policy: AutoKeep,
            weight_limit: 0.5,
            criterion: OutlierCriterion::Chauvenet,
            confidence: 0.99,
        }
    }
}

impl Default for Lwm<AutoKeep> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: DecisionPolicy> Lwm<P> {
    /// Replace the outlier decision policy.
    pub fn with_policy<Q: DecisionPolicy>(self, policy: Q) -> Lwm<Q> {
        Lwm {
            policy,
            weight_limit: self.weight_limit,
            criterion: self.criterion,
            confidence: self.confidence,
        }
    }

    /// Maximum relative weight any single measurement may carry.
    pub fn with_weight_limit(mut self, limit: f64) -> Self {
        assert!(
            limit > 0.0 && limit < 1.0,
            "Weight limit must be in (0, 1)"
        );
        self.weight_limit = limit;
        self
    }

    /// Outlier criterion run before averaging.
    pub fn with_criterion(mut self, criterion: OutlierCriterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Confidence level for the critical chi-square consistency test.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        assert!(
            confidence > 0.0 && confidence < 1.0,
            "Confidence level must be in (0, 1)"
        );
        self.confidence = confidence;
        self
    }

    /// Compute the LWM average.
    pub fn average(&self, data: &[Measurement]) -> Result<Measurement> {
        Ok(self.average_with_report(data)?.0)
    }

    /// Compute the LWM average and its diagnostic report.
    pub fn average_with_report(&self, data: &[Measurement]) -> Result<(Measurement, Report)> {
        const EPSILON: f64 = 1e-5;
        const MAX_ADJUSTMENTS: usize = 5000;

        let n = data.len();
        if n < 2 {
            return Err(Error::insufficient(2, n));
        }

        let mut report = Report::new(METHOD, data);
        report.rejection_confidence = Some(100.0 * self.confidence);

        if let Some(exact) = degenerate_consensus(data)? {
            let result = exact.with_name("LWM");
            report.means = vec![result.clone()];
            return Ok((result, report));
        }

        // Outlier stage: the criterion proposes, the policy disposes.
        let mut removed: Vec<usize> = Vec::new();
        if n > 2 {
            for i in self.criterion.detect(data)? {
                if n - removed.len() <= 2 {
                    break;
                }
                if self.policy.remove_outlier(self.criterion.name(), &data[i]) {
                    debug!(index = i, criterion = self.criterion.name(), "outlier removed");
                    removed.push(i);
                }
            }
        }
        let mut working: Vec<Measurement> = (0..n)
            .filter(|i| !removed.contains(i))
            .map(|i| data[i].clone())
            .collect();
        let m = working.len();
        report.outliers = removed;

        let fit = weighted_fit(&working, false)?;
        let critical = chi_square::global().critical(m - 1, self.confidence, true);
        report.critical_chi_square = Some(critical);

        if fit.reduced_chi_square < critical {
            // Consistent: the weighted mean stands unmodified.
            let result = fit.result.with_name("LWM");
            report.reduced_chi_square = Some(fit.reduced_chi_square);
            report.relative_weights = Some(fit.relative_weights);
            report.point_chi_square = Some(fit.point_chi_square);
            report.means = vec![
                fit.internal.with_name("LWM (Internal Uncertainty)"),
                fit.external.with_name("LWM (External Uncertainty)"),
            ];
            report.adjusted = Some(working);
            return Ok((result, report));
        }

        // Limit the statistical weights on a working copy, one offender
        // per pass.
        let mut changed: Vec<usize> = Vec::new();
        for _ in 0..MAX_ADJUSTMENTS {
            let weights: Vec<f64> = working.iter().map(|p| 1.0 / p.variance()).collect();
            let total: f64 = weights.iter().sum();
            let Some(i) = (0..m).find(|&i| weights[i] / total - self.weight_limit > EPSILON)
            else {
                break;
            };
            if !changed.contains(&i) {
                changed.push(i);
            }
            let adjustment =
                self.weight_limit * (total - weights[i]) / (weights[i] * (1.0 - self.weight_limit));
            working[i].lower /= adjustment.sqrt();
            working[i].upper /= adjustment.sqrt();
            debug!(index = i, adjustment, "statistical weight limited");
        }

        let fit = weighted_fit(&working, false)?;
        let (unweighted, unweighted_report) =
            UnweightedAverage::new().average_with_report(&working)?;
        let reduced = fit.reduced_chi_square;
        report.reduced_chi_square = Some(reduced);
        report.adjusted_points = changed;

        // Still inconsistent and the two means disagree: offer the
        // unweighted mean.
        if !fit.result.overlaps(&unweighted)
            && reduced > critical
            && self.policy.adopt_unweighted_mean(&fit.result, &unweighted)
        {
            let result = unweighted.with_name("LWM");
            report.adopted_unweighted = true;
            report.squared_deviations = unweighted_report.squared_deviations;
            report.means = vec![result.clone()];
            report.adjusted = Some(working);
            return Ok((result, report));
        }

        let mut result = fit.result.with_name("LWM");
        report.relative_weights = Some(fit.relative_weights);
        report.point_chi_square = Some(fit.point_chi_square);
        let mut means = vec![
            fit.internal.with_name("LWM (Internal Uncertainty)"),
            fit.external.with_name("LWM (External Uncertainty)"),
        ];

        // Last resort: widen the result to touch the most precise input.
        let precise = &data[most_precise(data, result.value)];
        if !result.overlaps(precise) && reduced > critical {
            if result.value < precise.value {
                result.upper = (result.value - (precise.value - precise.lower)).abs();
                result.lower = result.upper;
            } else {
                result.lower = (result.value - (precise.value + precise.upper)).abs();
                result.upper = result.lower;
            }
            debug!(sigma = result.upper, "uncertainty widened to overlap most precise value");
            means.push(
                result
                    .clone()
                    .with_name("LWM (Uncertainty increased to overlap most precise value)"),
            );
        }
        report.means = means;
        report.adjusted = Some(working);

        Ok((result, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::AutoAccept;
    use approx::assert_relative_eq;

    #[test]
    fn test_consistent_data_returns_weighted_mean() {
        let data = vec![
            Measurement::symmetric(10.0, 1.0),
            Measurement::symmetric(10.2, 1.0),
            Measurement::symmetric(9.9, 1.0),
        ];
        let (result, report) = Lwm::new().average_with_report(&data).unwrap();
        assert_eq!(result.name, "LWM");
        assert_relative_eq!(result.value, 10.033333, epsilon = 1e-4);
        assert!(report.reduced_chi_square.unwrap() < report.critical_chi_square.unwrap());
        assert!(report.adjusted_points.is_empty());
        assert!(report.outliers.is_empty());
    }

    #[test]
    fn test_weight_limit_invariant() {
        // One hyper-precise point would dominate; after limiting, no
        // relative 1/variance weight exceeds the limit.
        let data = vec![
            Measurement::symmetric(10.0, 0.01),
            Measurement::symmetric(10.4, 0.1),
            Measurement::symmetric(11.0, 0.5),
        ];
        let (_, report) = Lwm::new().average_with_report(&data).unwrap();
        let adjusted = report.adjusted.unwrap();
        let weights: Vec<f64> = adjusted.iter().map(|m| 1.0 / m.variance()).collect();
        let total: f64 = weights.iter().sum();
        for w in &weights {
            assert!(w / total <= 0.5 + 1e-5, "weight {} exceeds limit", w / total);
        }
        assert!(!report.adjusted_points.is_empty());
    }

    #[test]
    fn test_outlier_removed_with_accepting_policy() {
        let data = vec![
            Measurement::symmetric(10.0, 0.1),
            Measurement::symmetric(10.1, 0.1),
            Measurement::symmetric(9.9, 0.1),
            Measurement::symmetric(50.0, 0.1),
        ];
        let (result, report) = Lwm::new()
            .with_policy(AutoAccept)
            .average_with_report(&data)
            .unwrap();
        assert_eq!(report.outliers, vec![3]);
        assert!((result.value - 10.0).abs() < 0.1);
    }

    #[test]
    fn test_keep_policy_retains_outlier() {
        let data = vec![
            Measurement::symmetric(10.0, 0.1),
            Measurement::symmetric(10.1, 0.1),
            Measurement::symmetric(9.9, 0.1),
            Measurement::symmetric(50.0, 0.1),
        ];
        let (_, report) = Lwm::new().average_with_report(&data).unwrap();
        assert!(report.outliers.is_empty());
    }

    #[test]
    fn test_insufficient_data() {
        let data = vec![Measurement::symmetric(1.0, 0.1)];
        assert!(matches!(
            Lwm::new().average(&data),
            Err(Error::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_custom_criterion_and_limit() {
        let data = vec![
            Measurement::symmetric(10.0, 0.5),
            Measurement::symmetric(10.3, 0.5),
            Measurement::symmetric(9.8, 0.5),
        ];
        let result = Lwm::new()
            .with_criterion(OutlierCriterion::Birch)
            .with_weight_limit(0.6)
            .with_confidence(0.95)
            .average(&data)
            .unwrap();
        assert!((result.value - 10.03).abs() < 0.1);
    }
}
