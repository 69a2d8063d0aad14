//! Bootstrap average of resampled medians
//!
//! Each synthetic dataset draws a slot index uniformly, then a value from
//! that measurement's asymmetric Gaussian; the estimate is the mean of
//! the synthetic datasets' medians with the unbiased sample deviation of
//! those medians as its uncertainty.

use crate::weights::weighted_chi_square;
use discrepant_core::math::{median, sample_variance};
use discrepant_core::{Error, Measurement, Report, Result};
use discrepant_numeric::sampling::asymmetric_normal;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const METHOD: &str = "Bootstrap";

/// The bootstrap estimator.
#[derive(Debug, Clone, Copy)]
pub struct BootstrapMedian {
    resamples: usize,
    seed: Option<u64>,
}

impl BootstrapMedian {
    /// Bootstrap with the default 800,000 resamples and an entropy seed.
    pub fn new() -> Self {
        Self {
            resamples: 800_000,
            seed: None,
        }
    }

    /// Set the number of synthetic datasets to draw.
    pub fn with_resamples(mut self, resamples: usize) -> Self {
        assert!(resamples > 1, "Need at least two resamples");
        self.resamples = resamples;
        self
    }

    /// Seed the generator for reproducible results.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Compute the bootstrap average.
    pub fn average(&self, data: &[Measurement]) -> Result<Measurement> {
        Ok(self.average_with_report(data)?.0)
    }

    /// Compute the bootstrap average and its diagnostic report.
    pub fn average_with_report(&self, data: &[Measurement]) -> Result<(Measurement, Report)> {
        let n = data.len();
        if n == 0 {
            return Err(Error::insufficient(1, 0));
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut medians = Vec::with_capacity(self.resamples);
        let mut sample = vec![0.0_f64; n];
        for _ in 0..self.resamples {
            for slot in sample.iter_mut() {
                let source = &data[rng.gen_range(0..n)];
                *slot = asymmetric_normal(&mut rng, source.value, source.lower, source.upper);
            }
            medians.push(median(&mut sample));
        }

        let mean = medians.iter().sum::<f64>() / medians.len() as f64;
        let sigma = sample_variance(&medians, mean).sqrt();
        let result = Measurement::named(mean, sigma, sigma, METHOD);

        let mut report = Report::new(METHOD, data);
        report.means = vec![result.clone()];
        report.resamples = Some(self.resamples);
        if n >= 2 {
            report.reduced_chi_square =
                Some(weighted_chi_square(data, result.value) / (n as f64 - 1.0));
        }

        Ok((result, report))
    }
}

impl Default for BootstrapMedian {
    fn default() -> Self {
        Self::new()
    }
}
