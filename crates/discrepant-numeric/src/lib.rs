//! Numerical layer for the discrepant-stats workspace
//!
//! Four small pieces the averaging estimators lean on:
//!
//! - [`special`] — gamma/erf families (statrs-backed) plus a bisection
//!   inverse of the lower incomplete gamma
//! - [`roots`] — Brent's-method root finder and a grid-search maximizer
//! - [`chi_square`] — memoized critical chi-square lookups
//! - [`sampling`] — uniform/normal/asymmetric-normal draws and sampling
//!   without replacement

pub mod chi_square;
pub mod roots;
pub mod sampling;
pub mod special;

pub use chi_square::{ChiSquareCache, CriticalChiSquare};
pub use roots::{find_max, uniroot};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
