//! Averaging estimators and outlier criteria for discrepant measurements
//!
//! Nine ways to combine independent measurements of one quantity — each
//! with possibly asymmetric uncertainties — into a single best estimate,
//! and four criteria for spotting the measurements that do not belong:
//!
//! | Estimator | Idea |
//! |---|---|
//! | [`UnweightedAverage`] | arithmetic mean, max(internal, external) uncertainty |
//! | [`WeightedAverage`] | asymmetric maximum-likelihood mean with profile-likelihood bounds |
//! | [`Lwm`] | weighted mean with per-point statistical weight capped |
//! | [`Nrm`] | uncertainties inflated until all normalized residuals pass |
//! | [`Rajeval`] | jackknife outlier stage plus consistency-driven inflation |
//! | [`ExpectedValue`] | self-consistent kernel weighting by the mean density |
//! | [`BootstrapMedian`] | mean and spread of resampled-dataset medians |
//! | [`MandelPaule`] | one shared extra variance reconciling the scatter |
//! | [`MinimumVariance`] | mean minimizing the variance needed for consistency |
//!
//! Estimators that remove points do so only through a caller-supplied
//! [`DecisionPolicy`]; the headless default keeps everything. All of them
//! work on engine-owned copies — caller data is never mutated — and can
//! return a [`Report`] describing how the estimate was reached.
//!
//! # Example
//!
//! ```rust
//! use discrepant_average::{Measurement, WeightedAverage};
//!
//! let data = vec![
//!     Measurement::symmetric(10.0, 0.5),
//!     Measurement::new(10.4, 0.3, 0.2),
//!     Measurement::symmetric(9.8, 0.4),
//! ];
//! let result = WeightedAverage::new().average(&data).unwrap();
//! assert!(result.value > 9.8 && result.value < 10.4);
//! ```

pub mod bootstrap;
pub mod decision;
pub mod evm;
pub mod lwm;
pub mod mandel_paule;
pub mod min_variance;
pub mod nrm;
pub mod outliers;
pub mod rajeval;
pub mod unweighted;
pub mod weighted;
pub mod weights;

pub use bootstrap::BootstrapMedian;
pub use decision::{AutoAccept, AutoKeep, DecisionPolicy};
pub use evm::ExpectedValue;
pub use lwm::Lwm;
pub use mandel_paule::MandelPaule;
pub use min_variance::MinimumVariance;
pub use nrm::Nrm;
pub use outliers::{
    birch, birch_against, chauvenet, consistent_variance, modified_peirce, peirce,
    peirce_threshold, OutlierCriterion,
};
pub use rajeval::{Rajeval, RejectionConfidence};
pub use unweighted::UnweightedAverage;
pub use weighted::WeightedAverage;

// Re-export the core value types alongside the estimators.
pub use discrepant_core::{Error, HypothesisTest, Measurement, Report, Result};

/// Confidence level used for the critical chi-square quoted in reports.
pub const DEFAULT_CHI_CONFIDENCE: f64 = 0.95;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
