//! Error types for censored-data imputation
//!
//! Provides a unified error type for all censor-* crates.

use thiserror::Error;

/// Core error type for imputation operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter or configuration (unknown family, method, option value)
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Insufficient data for the requested operation
    #[error("Insufficient data: expected at least {expected} observed points, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// A value outside the support of the requested distribution family
    #[error("Data domain error: {family} requires strictly positive values, observation {index} has {value}")]
    DataDomain {
        index: usize,
        value: f64,
        family: &'static str,
    },

    /// Bounds that do not describe a valid bracket
    #[error("Malformed bounds at observation {index}: left bound {left} exceeds right bound {right}")]
    MalformedBounds { index: usize, left: f64, right: f64 },

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// Other errors (optimizer failures)
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create an error for too few observed points
    pub fn insufficient_observed(expected: usize, actual: usize) -> Self {
        Self::InsufficientData { expected, actual }
    }

    /// Create an error for size mismatch
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InvalidInput(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// Create an error for NaN/Inf values
    pub fn non_finite(context: &str) -> Self {
        Self::Computation(format!("{context} contains NaN or infinite values"))
    }

    /// Create an error for an unrecognised option name
    pub fn unknown_option(kind: &str, name: &str, expected: &[&str]) -> Self {
        Self::InvalidParameter(format!(
            "unknown {kind} '{name}', expected one of: {}",
            expected.join(", ")
        ))
    }

    /// Whether this error reports a positivity violation
    pub fn is_data_domain(&self) -> bool {
        matches!(self, Self::DataDomain { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidParameter("family must be set".to_string());
        assert_eq!(err.to_string(), "Invalid parameter: family must be set");

        let err = Error::InsufficientData { expected: 2, actual: 1 };
        assert_eq!(
            err.to_string(),
            "Insufficient data: expected at least 2 observed points, got 1"
        );

        let err = Error::DataDomain {
            index: 3,
            value: -1.5,
            family: "lognormal",
        };
        assert_eq!(
            err.to_string(),
            "Data domain error: lognormal requires strictly positive values, observation 3 has -1.5"
        );

        let err = Error::MalformedBounds {
            index: 0,
            left: 5.0,
            right: 2.0,
        };
        assert!(err.to_string().contains("left bound 5 exceeds right bound 2"));
    }

    #[test]
    fn test_error_helper_functions() {
        let err = Error::size_mismatch(10, 9, "status vector");
        assert_eq!(
            err.to_string(),
            "Invalid input: Size mismatch in status vector: expected 10, got 9"
        );

        let err = Error::non_finite("regression input");
        assert_eq!(
            err.to_string(),
            "Computation error: regression input contains NaN or infinite values"
        );

        let err = Error::unknown_option("family", "gamma", &["normal", "lognormal"]);
        assert_eq!(
            err.to_string(),
            "Invalid parameter: unknown family 'gamma', expected one of: normal, lognormal"
        );
    }

    #[test]
    fn test_error_from_anyhow() {
        let anyhow_err = anyhow::anyhow!("line search failed");
        let err: Error = anyhow_err.into();

        match err {
            Error::Other(_) => assert!(err.to_string().contains("line search failed")),
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_is_data_domain() {
        let err = Error::DataDomain {
            index: 0,
            value: 0.0,
            family: "weibull",
        };
        assert!(err.is_data_domain());
        assert!(!Error::Computation("x".into()).is_data_domain());
    }
}
