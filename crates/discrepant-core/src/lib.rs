//! Core types for averaging discrepant measurements
//!
//! This crate provides the foundational value types shared by the
//! discrepant-stats workspace:
//!
//! - [`Measurement`] — a central value with asymmetric upper/lower
//!   uncertainties, defining an asymmetric Gaussian density
//! - [`Report`] — the diagnostic bundle estimators return alongside a
//!   result
//! - [`Error`]/[`Result`] — the unified error type
//! - [`math`] — small slice reductions used across the workspace

pub mod error;
pub mod math;
pub mod measurement;
pub mod report;

pub use error::{Error, Result};
pub use measurement::{Measurement, DEFAULT_NAME, DEGENERATE_VARIANCE};
pub use report::{HypothesisTest, Report};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
