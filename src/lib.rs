//! Averaging and outlier-detection toolkit for discrepant measurements
//! with asymmetric uncertainties
//!
//! This crate re-exports the workspace members:
//!
//! - `discrepant_core` — the [`Measurement`] value type, the [`Report`]
//!   bundle, and the shared error type
//! - `discrepant_numeric` — special functions, root finding, the
//!   critical chi-square cache, and random sampling
//! - `discrepant_average` — the nine averaging estimators and four
//!   outlier criteria
//!
//! # Example
//!
//! ```rust
//! use discrepant_stats::average::{Lwm, OutlierCriterion};
//! use discrepant_stats::core::Measurement;
//!
//! let data = vec![
//!     Measurement::symmetric(10.0, 0.5),
//!     Measurement::symmetric(10.3, 0.4),
//!     Measurement::symmetric(9.9, 0.6),
//! ];
//! let (result, report) = Lwm::new()
//!     .with_criterion(OutlierCriterion::Chauvenet)
//!     .average_with_report(&data)
//!     .unwrap();
//! assert_eq!(result.name, "LWM");
//! assert!(report.outliers.is_empty());
//! ```

pub use discrepant_average as average;
pub use discrepant_core as core;
pub use discrepant_numeric as numeric;

pub use discrepant_average::{
    AutoAccept, AutoKeep, BootstrapMedian, DecisionPolicy, ExpectedValue, Lwm, MandelPaule,
    MinimumVariance, Nrm, OutlierCriterion, Rajeval, UnweightedAverage, WeightedAverage,
};
pub use discrepant_core::{Error, Measurement, Report, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
