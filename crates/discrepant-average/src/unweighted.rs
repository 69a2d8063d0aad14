//! Unweighted (arithmetic-mean) average

use discrepant_core::{Error, Measurement, Report, Result};

/// Arithmetic mean of the central values, with uncertainty given by the
/// larger of the internal (propagated) and external (scatter) estimates.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnweightedAverage;

impl UnweightedAverage {
    /// Create the estimator.
    pub fn new() -> Self {
        Self
    }

    /// Compute the unweighted average.
    pub fn average(&self, data: &[Measurement]) -> Result<Measurement> {
        Ok(self.average_with_report(data)?.0)
    }

    /// Compute the unweighted average and its diagnostic report.
    pub fn average_with_report(&self, data: &[Measurement]) -> Result<(Measurement, Report)> {
        let n = data.len();
        if n == 0 {
            return Err(Error::insufficient(1, 0));
        }
        let n_f = n as f64;

        let mean = data.iter().map(|m| m.value).sum::<f64>() / n_f;
        let deviations: Vec<f64> = data.iter().map(|m| (mean - m.value).powi(2)).collect();

        // External uncertainty from the observed scatter; undefined for a
        // single measurement, where the scatter term is taken as zero.
        let external = if n > 1 {
            (deviations.iter().sum::<f64>() / (n_f * (n_f - 1.0))).sqrt()
        } else {
            0.0
        };
        let internal = 1.0 / data.iter().map(|m| 1.0 / m.variance()).sum::<f64>().sqrt();
        let sigma = internal.max(external);

        let result = Measurement::named(mean, sigma, sigma, "Unweighted Average");

        let mut report = Report::new("Unweighted Average", data);
        report.squared_deviations = Some(deviations);
        report.means = vec![result.clone()];

        Ok((result, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_three_point_mean() {
        let data = vec![
            Measurement::symmetric(10.0, 1.0),
            Measurement::symmetric(12.0, 1.0),
            Measurement::symmetric(11.0, 1.0),
        ];
        let result = UnweightedAverage::new().average(&data).unwrap();
        assert_relative_eq!(result.value, 11.0, epsilon = 1e-12);
        // internal = 1/sqrt(3), external = sqrt(2/6): equal here
        assert_relative_eq!(result.upper, (1.0f64 / 3.0).sqrt(), epsilon = 1e-12);
        assert_relative_eq!(result.lower, result.upper, epsilon = 1e-15);
    }

    #[test]
    fn test_external_dominates_scattered_data() {
        let data = vec![
            Measurement::symmetric(10.0, 0.1),
            Measurement::symmetric(11.0, 0.1),
        ];
        let result = UnweightedAverage::new().average(&data).unwrap();
        assert_relative_eq!(result.value, 10.5, epsilon = 1e-12);
        // external = sqrt(0.5/2) = 0.5, internal = 0.1/sqrt(2)
        assert_relative_eq!(result.upper, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_internal_dominates_consistent_data() {
        let data = vec![
            Measurement::symmetric(10.0, 2.0),
            Measurement::symmetric(10.1, 2.0),
        ];
        let result = UnweightedAverage::new().average(&data).unwrap();
        // external = sqrt(0.005) ~ 0.07, internal = sqrt(2)
        assert_relative_eq!(result.upper, 2.0 / std::f64::consts::SQRT_2, epsilon = 1e-12);
    }

    #[test]
    fn test_single_measurement() {
        let data = vec![Measurement::symmetric(7.0, 0.4)];
        let result = UnweightedAverage::new().average(&data).unwrap();
        assert_relative_eq!(result.value, 7.0, epsilon = 1e-12);
        assert_relative_eq!(result.upper, 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_dataset() {
        assert!(UnweightedAverage::new().average(&[]).is_err());
    }

    #[test]
    fn test_report_contents() {
        let data = vec![
            Measurement::symmetric(1.0, 0.5),
            Measurement::symmetric(3.0, 0.5),
        ];
        let (result, report) = UnweightedAverage::new().average_with_report(&data).unwrap();
        assert_eq!(report.method, "Unweighted Average");
        let devs = report.squared_deviations.unwrap();
        assert_relative_eq!(devs[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(devs[1], 1.0, epsilon = 1e-12);
        assert_eq!(report.means.len(), 1);
        assert!(report.means[0].same_quantity(&result));
    }

    proptest! {
        #[test]
        fn prop_order_invariant(values in proptest::collection::vec((-100.0f64..100.0, 0.1f64..5.0), 1..8)) {
            let data: Vec<Measurement> =
                values.iter().map(|&(v, s)| Measurement::symmetric(v, s)).collect();
            let mut reversed = data.clone();
            reversed.reverse();
            let a = UnweightedAverage::new().average(&data).unwrap();
            let b = UnweightedAverage::new().average(&reversed).unwrap();
            prop_assert!((a.value - b.value).abs() <= 1e-9 * (1.0 + a.value.abs()));
            prop_assert!((a.upper - b.upper).abs() <= 1e-9 * (1.0 + a.upper.abs()));
        }

        #[test]
        fn prop_equals_arithmetic_mean(values in proptest::collection::vec((-50.0f64..50.0, 0.1f64..5.0), 1..10)) {
            let data: Vec<Measurement> =
                values.iter().map(|&(v, s)| Measurement::symmetric(v, s)).collect();
            let expected = values.iter().map(|&(v, _)| v).sum::<f64>() / values.len() as f64;
            let result = UnweightedAverage::new().average(&data).unwrap();
            prop_assert!((result.value - expected).abs() <= 1e-9 * (1.0 + expected.abs()));
        }
    }
}
