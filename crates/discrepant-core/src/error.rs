//! Error types for the averaging toolkit
//!
//! Provides a unified error type for all discrepant-stats crates.

use thiserror::Error;

/// Core error type for averaging and outlier-detection operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Insufficient data for the requested operation
    #[error("Insufficient data: expected at least {expected} measurements, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// The endpoints handed to the root finder do not straddle a root
    #[error("No root bracketed in [{lo}, {hi}]")]
    NoBracket { lo: f64, hi: f64 },

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create an error for a dataset that is too small
    pub fn insufficient(expected: usize, actual: usize) -> Self {
        Self::InsufficientData { expected, actual }
    }

    /// Create an error for an invalid confidence level
    pub fn invalid_confidence(c: f64) -> Self {
        Self::InvalidParameter(format!("Confidence level {c} must be in (0, 1)"))
    }

    /// Create an error for NaN/Inf values
    pub fn non_finite(context: &str) -> Self {
        Self::Computation(format!("{context} contains NaN or infinite values"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidParameter("weight limit must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid parameter: weight limit must be positive"
        );

        let err = Error::InsufficientData {
            expected: 2,
            actual: 1,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient data: expected at least 2 measurements, got 1"
        );

        let err = Error::NoBracket { lo: 0.0, hi: 1.0 };
        assert_eq!(err.to_string(), "No root bracketed in [0, 1]");
    }

    #[test]
    fn test_error_helpers() {
        match Error::insufficient(3, 2) {
            Error::InsufficientData { expected, actual } => {
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            _ => panic!("Wrong error type"),
        }

        let err = Error::invalid_confidence(1.5);
        assert_eq!(
            err.to_string(),
            "Invalid parameter: Confidence level 1.5 must be in (0, 1)"
        );

        let err = Error::non_finite("residuals");
        assert_eq!(
            err.to_string(),
            "Computation error: residuals contains NaN or infinite values"
        );
    }

    #[test]
    fn test_error_from_anyhow() {
        let err: Error = anyhow::anyhow!("custom error message").into();
        match err {
            Error::Other(_) => assert!(err.to_string().contains("custom error message")),
            _ => panic!("Wrong error type"),
        }
    }
}
