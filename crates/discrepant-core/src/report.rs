//! Diagnostic report bundle returned by the averaging estimators
//!
//! A [`Report`] is pure data: it records how an estimate was reached
//! (weights, chi-square contributions, adjustments, rejected points) for a
//! rendering collaborator, and never feeds back into the numeric result.
//! Fields that a given estimator does not produce are left `None`/empty.

use crate::measurement::Measurement;
use serde::{Deserialize, Serialize};

/// Summary of the hypothesis test run by the Expected Value Method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HypothesisTest {
    /// Probability of a measurement falling below the estimate
    pub p_below: f64,
    /// Probability of a measurement falling above the estimate
    pub p_above: f64,
    /// Observed number of measurements below the estimate
    pub observed_below: usize,
    /// Observed number of measurements above the estimate
    pub observed_above: usize,
    /// Q statistic (approximately chi-square with 1 dof)
    pub q_statistic: f64,
    /// Confidence level for the test, `1 - erf(sqrt(Q/2))`
    pub confidence: f64,
}

/// Detailed output from one run of an averaging estimator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    /// Name of the estimator that produced this report
    pub method: String,
    /// The caller-supplied dataset, untouched
    pub dataset: Vec<Measurement>,
    /// The working dataset after outlier removal and uncertainty
    /// adjustment, where an estimator maintains one
    pub adjusted: Option<Vec<Measurement>>,
    /// Candidate means (e.g. internal-/external-uncertainty variants)
    pub means: Vec<Measurement>,
    /// Relative weight of each point in the final average
    pub relative_weights: Option<Vec<f64>>,
    /// Contribution of each point to the chi-square
    pub point_chi_square: Option<Vec<f64>>,
    /// Squared deviation of each point from the unweighted mean
    pub squared_deviations: Option<Vec<f64>>,
    /// Normalized residual of each point (NRM)
    pub normalized_residuals: Option<Vec<f64>>,
    /// Reduced chi-square of the result
    pub reduced_chi_square: Option<f64>,
    /// Critical reduced chi-square at `rejection_confidence`
    pub critical_chi_square: Option<f64>,
    /// Confidence level (percent) used for the critical chi-square
    pub rejection_confidence: Option<f64>,
    /// Indices (into `dataset`) of points removed as outliers
    pub outliers: Vec<usize>,
    /// Indices (into `adjusted`) of points whose uncertainties were changed
    pub adjusted_points: Vec<usize>,
    /// True if LWM fell back to the unweighted mean
    pub adopted_unweighted: bool,
    /// Hypothesis-test summary (EVM)
    pub hypothesis_test: Option<HypothesisTest>,
    /// Number of bootstrap resamples taken
    pub resamples: Option<usize>,
}

impl Report {
    /// Start a report for `method` over the given dataset.
    pub fn new(method: impl Into<String>, dataset: &[Measurement]) -> Self {
        Self {
            method: method.into(),
            dataset: dataset.to_vec(),
            ..Self::default()
        }
    }

    /// Smallest standard deviation among the input measurements, or 0 for
    /// an empty dataset.
    pub fn smallest_input_uncertainty(&self) -> f64 {
        if self.dataset.is_empty() {
            return 0.0;
        }
        self.dataset
            .iter()
            .map(Measurement::std_dev)
            .fold(f64::INFINITY, f64::min)
    }

    /// True if `average` carries a smaller variance than every input
    /// measurement.
    pub fn is_more_precise_than_inputs(&self, average: &Measurement) -> bool {
        self.dataset
            .iter()
            .all(|m| m.variance() > average.variance())
    }
}
