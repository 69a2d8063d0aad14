//! Asymmetric-uncertainty measurement type
//!
//! A [`Measurement`] is a central value with (possibly different) upper and
//! lower uncertainties at the usual 68% confidence level. It defines an
//! asymmetric Gaussian density: two half-normals sharing the mode at
//! `value`, with standard deviation `lower` below it and `upper` above it,
//! normalized so the total area is 1.

use serde::{Deserialize, Serialize};
use statrs::function::erf::erf;
use std::f64::consts::PI;

/// Constant used in the variance of the asymmetric Gaussian
const VARIANCE_FACTOR: f64 = 1.0 - 2.0 / PI;

/// Variance below which a measurement is treated as an exact value
pub const DEGENERATE_VARIANCE: f64 = 1e-40;

/// Name given to measurements which are not explicitly named
pub const DEFAULT_NAME: &str = "<default>";

/// The result of a measurement: a central value with asymmetric
/// upper/lower uncertainties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Central value (the mode of the density)
    pub value: f64,
    /// Standard deviation above the central value
    pub upper: f64,
    /// Standard deviation below the central value
    pub lower: f64,
    /// Name of the measurement
    pub name: String,
}

impl Measurement {
    /// Create a measurement with central value `value`, upper uncertainty
    /// `upper` and lower uncertainty `lower`.
    pub fn new(value: f64, upper: f64, lower: f64) -> Self {
        Self {
            value,
            upper,
            lower,
            name: DEFAULT_NAME.to_string(),
        }
    }

    /// Create a named measurement.
    pub fn named(value: f64, upper: f64, lower: f64, name: impl Into<String>) -> Self {
        Self {
            value,
            upper,
            lower,
            name: name.into(),
        }
    }

    /// Create a measurement with equal upper and lower uncertainty.
    pub fn symmetric(value: f64, sigma: f64) -> Self {
        Self::new(value, sigma, sigma)
    }

    /// Replace the name, consuming and returning the measurement.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Variance of the asymmetric Gaussian defined by this measurement.
    ///
    /// `var = (1 - 2/pi) * (upper - lower)^2 + upper * lower`; reduces to
    /// `upper^2` when the uncertainties are equal.
    pub fn variance(&self) -> f64 {
        VARIANCE_FACTOR * (self.upper - self.lower).powi(2) + self.upper * self.lower
    }

    /// Standard deviation, `sqrt(variance)`.
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// True if the variance is small enough that the measurement is
    /// treated as an exact value.
    pub fn is_exact(&self) -> bool {
        self.variance() < DEGENERATE_VARIANCE
    }

    /// Asymmetric Gaussian probability density evaluated at `x`.
    pub fn density(&self, x: f64) -> f64 {
        let side = if x <= self.value { self.lower } else { self.upper };
        (2.0 / PI).sqrt() / (self.lower + self.upper)
            * (-(x - self.value) * (x - self.value) / (2.0 * side * side)).exp()
    }

    /// Cumulative distribution function of the asymmetric Gaussian,
    /// i.e. the integral of [`density`](Self::density) from -inf to `x`.
    pub fn cdf(&self, x: f64) -> f64 {
        let (v, l, u) = (self.value, self.lower, self.upper);
        if x <= v {
            l / (l + u) * (1.0 + erf((x - v) / (std::f64::consts::SQRT_2 * l)))
        } else {
            u / (u + l) * erf((x - v) / (std::f64::consts::SQRT_2 * u)) + l / (u + l)
        }
    }

    /// Probability mass of the asymmetric Gaussian between `a` and `b`.
    pub fn interval_probability(&self, a: f64, b: f64) -> f64 {
        self.cdf(b) - self.cdf(a)
    }

    /// True if the error-bar intervals `[value - lower, value + upper]` of
    /// the two measurements intersect.
    pub fn overlaps(&self, other: &Measurement) -> bool {
        let (higher, lesser) = if self.value > other.value {
            (self, other)
        } else {
            (other, self)
        };
        higher.value - higher.lower < lesser.value + lesser.upper
    }

    /// Absolute deviation of the central value from `mean`, normalized to
    /// this measurement's standard deviation.
    pub fn normalized_deviation(&self, mean: f64) -> f64 {
        (self.value - mean).abs() / self.variance().sqrt()
    }

    /// True if any of the numeric fields is NaN.
    pub fn is_nan(&self) -> bool {
        self.value.is_nan() || self.upper.is_nan() || self.lower.is_nan()
    }

    /// True if the numeric fields match `other` exactly, ignoring names.
    pub fn same_quantity(&self, other: &Measurement) -> bool {
        self.value == other.value && self.upper == other.upper && self.lower == other.lower
    }
}

impl Default for Measurement {
    /// A standard-normal measurement: value 0, unit uncertainties.
    fn default() -> Self {
        Self::new(0.0, 1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_variance_symmetric() {
        let m = Measurement::symmetric(10.0, 1.5);
        assert_relative_eq!(m.variance(), 2.25, epsilon = 1e-12);
        assert_relative_eq!(m.std_dev(), 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_variance_asymmetric_closed_form() {
        let m = Measurement::new(5.0, 2.0, 1.0);
        let expected = (1.0 - 2.0 / PI) * 1.0 + 2.0;
        assert_relative_eq!(m.variance(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_is_exact() {
        assert!(Measurement::new(3.0, 0.0, 0.0).is_exact());
        assert!(!Measurement::symmetric(3.0, 1e-10).is_exact());
    }

    #[test]
    fn test_density_peak_and_symmetry() {
        let m = Measurement::symmetric(0.0, 1.0);
        let peak = (2.0 / PI).sqrt() / 2.0;
        assert_relative_eq!(m.density(0.0), peak, epsilon = 1e-12);
        assert_relative_eq!(m.density(1.0), m.density(-1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_cdf_limits_and_mode() {
        let m = Measurement::new(2.0, 1.0, 0.5);
        // At the mode the lower half-normal has contributed half its area.
        assert_relative_eq!(m.cdf(2.0), 0.5 / 1.5, epsilon = 1e-12);
        assert!(m.cdf(-50.0) < 1e-12);
        assert!((m.cdf(50.0) - 1.0).abs() < 1e-12);
        // Standard-normal special case matches the usual CDF value.
        let n = Measurement::default();
        assert_relative_eq!(n.cdf(1.96), 0.975, epsilon = 1e-3);
    }

    #[test]
    fn test_interval_probability_total() {
        let m = Measurement::new(1.0, 0.3, 0.7);
        assert_relative_eq!(m.interval_probability(-100.0, 100.0), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_overlaps() {
        let a = Measurement::symmetric(10.0, 1.0);
        let b = Measurement::symmetric(11.5, 1.0);
        let c = Measurement::symmetric(13.0, 0.5);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(b.overlaps(&c));
    }

    #[test]
    fn test_normalized_deviation() {
        let m = Measurement::symmetric(10.0, 2.0);
        assert_relative_eq!(m.normalized_deviation(14.0), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_is_nan() {
        assert!(Measurement::symmetric(f64::NAN, 1.0).is_nan());
        assert!(Measurement::new(0.0, f64::NAN, 1.0).is_nan());
        assert!(!Measurement::symmetric(0.0, 1.0).is_nan());
    }

    #[test]
    fn test_same_quantity_ignores_name() {
        let a = Measurement::named(1.0, 0.1, 0.2, "a");
        let b = Measurement::named(1.0, 0.1, 0.2, "b");
        assert!(a.same_quantity(&b));
        assert_ne!(a, b);
    }

    proptest! {
        #[test]
        fn prop_overlaps_is_symmetric(
            v1 in -100.0f64..100.0, u1 in 0.01f64..10.0, l1 in 0.01f64..10.0,
            v2 in -100.0f64..100.0, u2 in 0.01f64..10.0, l2 in 0.01f64..10.0,
        ) {
            let a = Measurement::new(v1, u1, l1);
            let b = Measurement::new(v2, u2, l2);
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn prop_variance_reduces_to_square(v in -100.0f64..100.0, s in 0.01f64..10.0) {
            let m = Measurement::symmetric(v, s);
            prop_assert!((m.variance() - s * s).abs() < 1e-10 * s * s);
        }
    }
}
